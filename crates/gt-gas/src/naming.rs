//! Output file names derived from the generation parameters.

use crate::fields::FieldSet;
use crate::mixture::Mixture;
use crate::table::Environment;
use gt_core::{file_safe, number_to_clean_string};

pub const GAS_FILE_EXTENSION: &str = "gas";

fn token(value: f64) -> String {
    file_safe(&number_to_clean_string(value))
}

fn spacing_tag(tag: &str, points: Option<usize>, total: usize) -> String {
    match points {
        Some(n) if n == total => tag.to_string(),
        Some(n) => format!("{tag}{n}"),
        None => String::new(),
    }
}

/// `<mixture>-T<t>C-P<p>bar-nColl<n>-E<first>[t<last>]Vcm-nE<count>[lin<n>][log<n>].gas`
///
/// Numbers are rounded to three decimals with `.` written as `p`.
pub fn output_file_name(
    mixture: &Mixture,
    environment: &Environment,
    collisions: u32,
    fields: &FieldSet,
) -> String {
    let mut name = format!(
        "{}-T{}C-P{}bar-nColl{}",
        mixture.name(),
        token(environment.temperature_celsius()),
        token(environment.pressure_bar()),
        collisions
    );

    if let Some(first) = fields.first() {
        name.push_str(&format!("-E{}", token(first)));
        if fields.len() > 1 {
            if let Some(last) = fields.last() {
                name.push_str(&format!("t{}", token(last)));
            }
        }
        name.push_str("Vcm");
    }

    name.push_str(&format!("-nE{}", fields.len()));
    name.push_str(&spacing_tag("lin", fields.linear_points(), fields.len()));
    name.push_str(&spacing_tag("log", fields.log_points(), fields.len()));
    name.push('.');
    name.push_str(GAS_FILE_EXTENSION);
    name
}
