/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Linear ratio of a value in dB.
pub fn ratio_of_db(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// dB value of a linear ratio.
pub fn ratio_to_db(ratio: f64) -> f64 {
    10.0 * ratio.log10()
}

pub fn dbm_to_watt(dbm: f64) -> f64 {
    ratio_of_db(dbm) * 1.0e-3
}

/// Attenuation in dB/km converted to a linear coefficient in 1/m.
pub fn alpha_linear(alpha_db_per_km: f64) -> f64 {
    alpha_db_per_km / (1.0e4 * std::f64::consts::E.log10())
}

/// Group velocity dispersion beta2 (s^2/m) for dispersion `d` (s/m^2) at `frequency` (Hz).
pub fn beta2(d: f64, frequency: f64) -> f64 {
    let lambda = SPEED_OF_LIGHT / frequency;
    -d * lambda.powi(2) / (2.0 * std::f64::consts::PI * SPEED_OF_LIGHT)
}

/// Error function, closed-form approximation with a = 0.140012.
pub fn erf(x: f64) -> f64 {
    let a = 0.140012;
    let t = x * x;
    let p = (4.0 / std::f64::consts::PI + a * t) / (1.0 + a * t);
    x.signum() * (1.0 - (-t * p).exp()).sqrt()
}

pub fn erfc(x: f64) -> f64 {
    1.0 - erf(x)
}

/// Bit error rate of an M-QAM signal at linear SNR `snr`.
pub fn bit_error_rate(snr: f64, constellation_size: f64) -> f64 {
    let bits = constellation_size.log2();
    let snr_per_bit = snr / bits;
    let argument = (3.0 * snr_per_bit * bits) / (2.0 * (constellation_size - 1.0));
    let sqrt_m = constellation_size.sqrt();

    (2.0 / bits) * ((sqrt_m - 1.0) / sqrt_m) * erfc(argument.sqrt())
}
