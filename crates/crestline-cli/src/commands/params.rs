//! Limiter parameter listing.

#![allow(clippy::print_literal)] // table headers use literal strings

use anyhow::Context;
use clap::Args;
use crestline_core::{ParamDescriptor, ParamUnit};
use crestline_limiter::DESCRIPTORS;
use serde::Serialize;

#[derive(Args)]
pub struct ParamsArgs {
    /// Show only this parameter (string id, name, or short name)
    #[arg(value_name = "PARAM")]
    param: Option<String>,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ParamRow {
    index: usize,
    id: u32,
    string_id: &'static str,
    name: &'static str,
    unit: &'static str,
    min: f32,
    max: f32,
    default: f32,
}

impl ParamRow {
    fn new(index: usize, desc: &ParamDescriptor) -> Self {
        Self {
            index,
            id: desc.id.0,
            string_id: desc.string_id,
            name: desc.name,
            unit: desc.unit.suffix(),
            min: desc.min,
            max: desc.max,
            default: desc.default,
        }
    }

    fn range(&self, unit: ParamUnit) -> String {
        match unit {
            ParamUnit::Toggle => "off/on".to_string(),
            _ => format!("{} to {} {}", self.min, self.max, self.unit),
        }
    }
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let selected: Vec<(usize, ParamDescriptor)> = match &args.param {
        Some(name) => {
            let index = crestline_config::param_index(name)
                .with_context(|| format!("unknown parameter '{name}'"))?;
            vec![(index, DESCRIPTORS[index])]
        }
        None => DESCRIPTORS.into_iter().enumerate().collect(),
    };

    if args.json {
        let rows: Vec<_> = selected.iter().map(|(i, d)| ParamRow::new(*i, d)).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "  {:3}  {:14}  {:10}  {:22}  {}",
        "#", "Id", "Name", "Range", "Default"
    );
    println!(
        "  {:3}  {:14}  {:10}  {:22}  {}",
        "-", "--", "----", "-----", "-------"
    );
    for (index, desc) in &selected {
        let row = ParamRow::new(*index, desc);
        let default = match desc.unit {
            ParamUnit::Toggle if desc.default >= 0.5 => "on".to_string(),
            ParamUnit::Toggle => "off".to_string(),
            _ => format!("{}", desc.default),
        };
        println!(
            "  {:3}  {:14}  {:10}  {:22}  {}",
            index,
            desc.string_id,
            desc.name,
            row.range(desc.unit),
            default
        );
    }

    println!();
    println!("Set values with: crestline process in.wav out.wav --set attack_ms=5");

    Ok(())
}
