//! Built-in solar system used until a system is configured or adopted.
//!
//! Distances and periods are in scene units and seconds, picked for
//! readability on screen rather than to scale.

use crate::star_systems::{PlanetRecord, StarDescriptor, SystemRecord};

// (name, orbit radius, period s, inclination deg, size, color)
const PLANETS: [(&str, f32, f32, f32, f32, &str); 8] = [
    ("Mercury", 40.0, 14.5, 7.0, 1.6, "#b1aca6"),
    ("Venus", 60.0, 37.0, 3.4, 3.0, "#e8c88f"),
    ("Earth", 85.0, 60.0, 0.0, 3.2, "#3b7dd8"),
    ("Mars", 110.0, 113.0, 1.85, 2.2, "#c1440e"),
    ("Jupiter", 170.0, 300.0, 1.3, 9.5, "#d8ca9d"),
    ("Saturn", 235.0, 420.0, 2.5, 8.0, "#e3d6a8"),
    ("Uranus", 295.0, 560.0, 0.8, 5.2, "#a6e0e8"),
    ("Neptune", 350.0, 700.0, 1.8, 5.0, "#4b70dd"),
];

pub fn solar_system() -> SystemRecord {
    SystemRecord {
        id: 0,
        name: "Solar System".to_string(),
        star: StarDescriptor {
            name: "Sun".to_string(),
            radius: 20.0,
            color: "#ffd27f".to_string(),
        },
        planets: PLANETS
            .iter()
            .map(
                |&(name, orbit_radius, orbital_period, inclination, size, color)| PlanetRecord {
                    name: name.to_string(),
                    orbit_radius,
                    orbital_period,
                    inclination,
                    size,
                    color: color.to_string(),
                    texture: None,
                },
            )
            .collect(),
    }
}
