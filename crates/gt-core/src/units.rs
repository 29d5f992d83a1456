//! Environment unit conversions at the engine boundary.
//!
//! Users speak bar and degrees Celsius; the transport engine works in torr and
//! kelvin. Conversions are stateless and go through `uom`.

use uom::si::f64::{Pressure, ThermodynamicTemperature};
use uom::si::pressure::{bar, torr};
use uom::si::thermodynamic_temperature::{degree_celsius, kelvin};

/// One standard atmosphere [torr].
pub const ATMOSPHERE_TORR: f64 = 760.0;

/// Default gas temperature [°C].
pub const DEFAULT_TEMPERATURE_CELSIUS: f64 = 20.0;

#[inline]
pub fn bar_to_torr(p_bar: f64) -> f64 {
    Pressure::new::<bar>(p_bar).get::<torr>()
}

#[inline]
pub fn torr_to_bar(p_torr: f64) -> f64 {
    Pressure::new::<torr>(p_torr).get::<bar>()
}

#[inline]
pub fn celsius_to_kelvin(t_celsius: f64) -> f64 {
    ThermodynamicTemperature::new::<degree_celsius>(t_celsius).get::<kelvin>()
}

#[inline]
pub fn kelvin_to_celsius(t_kelvin: f64) -> f64 {
    ThermodynamicTemperature::new::<kelvin>(t_kelvin).get::<degree_celsius>()
}
