//! Device-class tuning presets
//!
//! The simulation is parameter-pure: every device-dependent number is
//! collected here, chosen once at startup from a [`DeviceClass`], and
//! passed by reference into the physics routines. Presets serialize to
//! JSON so balance tweaks can be loaded as data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which parameter preset to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Desktop => "Desktop",
            DeviceClass::Mobile => "Mobile",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "desktop" => Some(DeviceClass::Desktop),
            "mobile" | "touch" => Some(DeviceClass::Mobile),
            _ => None,
        }
    }
}

/// All device-dependent tunables.
///
/// Units: pixels and pixels-per-tick at the fixed 60 Hz rate; angles in
/// radians; periods in ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    // === Ball physics ===
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Horizontal damping while rolling on the seesaw
    pub seesaw_friction: f32,
    /// Horizontal damping while airborne (lower drag for air control)
    pub air_resistance: f32,
    /// Horizontal acceleration per tick of held input
    pub move_speed: f32,
    /// Input multiplier while grounded on the seesaw
    pub ground_control: f32,
    /// Input multiplier while airborne
    pub air_control: f32,

    // === Seesaw dynamics ===
    /// First-order filter coefficient toward the target angle
    pub angle_smoothing: f32,
    /// Net torque to target angle conversion
    pub torque_scale: f32,
    /// Hard tilt limit (further clamped by the geometric safe angle)
    pub max_angle: f32,
    /// Plank width as a fraction of display width
    pub seesaw_width_frac: f32,
    /// Plank thickness
    pub seesaw_height: f32,

    // === Object geometry & weights ===
    pub ball_radius: f32,
    pub ball_weight: f32,
    pub anvil_size: Vec2,
    pub anvil_weight: f32,
    pub anvil_spawn_velocity: f32,
    pub big_anvil_size: Vec2,
    pub big_anvil_weight: f32,
    pub big_anvil_spawn_velocity: f32,

    // === Spawn cadence ===
    pub anvil_spawn_period: u32,
    pub big_anvil_spawn_period: u32,

    // === Water pockets ===
    pub pocket_spawn_period: u32,
    pub pocket_width: f32,
    pub pocket_max_height: f32,
    pub pocket_rise_speed: f32,
    pub pocket_fall_speed: f32,
    /// Ticks a pocket holds at full height before falling
    pub pocket_lifetime: u32,
    /// Upward launch velocity applied to a rescued ball (negative = up)
    pub pocket_push_force: f32,
    /// Keep-out margin around the seesaw span when placing a pocket
    pub pocket_seesaw_buffer: f32,

    // === Playfield geometry ===
    /// Water surface distance from the bottom edge
    pub water_inset: f32,
    /// Seesaw pivot height above the water surface
    pub seesaw_above_water: f32,
    /// Default display size for this device class
    pub base_width: f32,
    pub base_height: f32,
}

impl Tuning {
    pub fn for_device(class: DeviceClass) -> Self {
        match class {
            DeviceClass::Desktop => Self::desktop(),
            DeviceClass::Mobile => Self::mobile(),
        }
    }

    pub fn desktop() -> Self {
        Self {
            gravity: 0.35,
            seesaw_friction: 0.98,
            air_resistance: 0.99,
            move_speed: 0.45,
            ground_control: 1.8,
            air_control: 0.8,
            angle_smoothing: 0.08,
            torque_scale: 0.0001,
            max_angle: 0.4,
            seesaw_width_frac: 0.7,
            seesaw_height: 25.0,
            ball_radius: 15.0,
            ball_weight: 1.0,
            anvil_size: Vec2::new(25.0, 35.0),
            anvil_weight: 10.0,
            anvil_spawn_velocity: 2.5,
            big_anvil_size: Vec2::new(45.0, 60.0),
            big_anvil_weight: 25.0,
            big_anvil_spawn_velocity: 3.0,
            anvil_spawn_period: 180,
            big_anvil_spawn_period: 400,
            pocket_spawn_period: 300,
            pocket_width: 200.0,
            pocket_max_height: 200.0,
            pocket_rise_speed: 4.0,
            pocket_fall_speed: 2.0,
            pocket_lifetime: 180,
            pocket_push_force: -15.0,
            pocket_seesaw_buffer: 50.0,
            water_inset: 100.0,
            seesaw_above_water: 250.0,
            base_width: 1500.0,
            base_height: 900.0,
        }
    }

    /// Mobile preset: stronger input response for touch, smaller
    /// objects, slower spawns, and geometry squeezed onto a short
    /// portrait playfield.
    pub fn mobile() -> Self {
        Self {
            gravity: 0.38,
            seesaw_friction: 0.94,
            air_resistance: 0.99,
            move_speed: 0.75,
            ground_control: 2.2,
            air_control: 1.2,
            angle_smoothing: 0.09,
            torque_scale: 0.00012,
            max_angle: 0.45,
            seesaw_width_frac: 0.75,
            seesaw_height: 20.0,
            ball_radius: 12.0,
            ball_weight: 1.0,
            anvil_size: Vec2::new(20.0, 28.0),
            anvil_weight: 10.0,
            anvil_spawn_velocity: 2.8,
            big_anvil_size: Vec2::new(35.0, 48.0),
            big_anvil_weight: 25.0,
            big_anvil_spawn_velocity: 3.3,
            anvil_spawn_period: 220,
            big_anvil_spawn_period: 500,
            pocket_spawn_period: 300,
            pocket_width: 60.0,
            pocket_max_height: 120.0,
            pocket_rise_speed: 4.0,
            pocket_fall_speed: 2.0,
            pocket_lifetime: 180,
            pocket_push_force: -15.0,
            pocket_seesaw_buffer: 30.0,
            water_inset: 40.0,
            seesaw_above_water: 80.0,
            base_width: 400.0,
            base_height: 600.0,
        }
    }

    /// Parse a tuning override from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Anvil weight by type
    #[inline]
    pub fn anvil_weight_for(&self, is_big: bool) -> f32 {
        if is_big { self.big_anvil_weight } else { self.anvil_weight }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::desktop()
    }
}
