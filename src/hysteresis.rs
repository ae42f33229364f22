/// Snap `angle` to the nearest multiple of `deadzone`. Less work for the motor.
pub fn quantize(angle: f64, deadzone: f64) -> f64 {
    (angle / deadzone).round() * deadzone
}

/// Only move once the dial is at least a full deadzone away from the target.
pub fn should_move(current: f64, target: f64, deadzone: f64) -> bool {
    (current - target).abs() >= deadzone
}
