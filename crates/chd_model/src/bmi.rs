/// Body mass index from height in centimetres and weight in kilograms,
/// rounded to two decimals. `None` unless both inputs are positive.
pub fn body_mass_index(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if !(height_cm.is_finite() && weight_kg.is_finite()) || height_cm <= 0.0 || weight_kg <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    Some((bmi * 100.0).round() / 100.0)
}
