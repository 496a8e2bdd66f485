/// Dark roast base colour before the per-cell tint is added.
pub(crate) const COFFEE_BASE: (f64, f64, f64) = (40.0, 25.0, 15.0);

/// Per-unit tint contribution to each coffee channel.
pub(crate) const COFFEE_TINT: (f64, f64, f64) = (0.3, 0.2, 0.1);

/// Steamed milk cream.
pub(crate) const MILK: (f64, f64, f64) = (245.0, 235.0, 220.0);

/// Density at which a cell reads as pure milk.
pub(crate) const MILK_SATURATION: f64 = 100.0;

/// Fraction of brightness lost at the cup wall.
pub(crate) const VIGNETTE_STRENGTH: f64 = 0.3;

/// Saucer behind the cup.
pub(crate) const BACKGROUND: [u8; 4] = [18, 14, 12, 255];

/// Crema color stops for the speed view.
/// Espresso -> roast -> caramel -> crema -> foam
pub(crate) const CREMA_STOPS: [(f64, f64, f64); 5] = [
    (22.0, 14.0, 10.0),    // espresso        (0.00)
    (92.0, 52.0, 28.0),    // medium roast    (0.25)
    (176.0, 104.0, 48.0),  // caramel         (0.50)
    (226.0, 172.0, 112.0), // crema           (0.75)
    (252.0, 244.0, 230.0), // foam            (1.00)
];

/// Latte colour of one cell: coffee and milk blended by density, then darkened
/// towards the wall. `rim` is the cell's distance from the centre divided by
/// the cup radius.
pub fn latte_rgba(density: f64, tint: f64, rim: f64) -> [u8; 4] {
    let milk = (density / MILK_SATURATION).clamp(0.0, 1.0);
    let coffee = (
        COFFEE_BASE.0 + tint * COFFEE_TINT.0,
        COFFEE_BASE.1 + tint * COFFEE_TINT.1,
        COFFEE_BASE.2 + tint * COFFEE_TINT.2,
    );
    let vignette = 1.0 - rim * VIGNETTE_STRENGTH;
    let mix = |c: f64, m: f64| ((c * (1.0 - milk) + m * milk) * vignette).clamp(0.0, 255.0) as u8;

    [mix(coffee.0, MILK.0), mix(coffee.1, MILK.1), mix(coffee.2, MILK.2), 255]
}

/// Convert a [0.0, 1.0] value to RGBA along the crema stops.
pub fn map_to_rgba(t: f64) -> [u8; 4] {
    let stops = &CREMA_STOPS;
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let seg = t * 4.0;
    let i = (seg as usize).min(3);
    let s = seg - i as f64;

    let (r0, g0, b0) = stops[i];
    let (r1, g1, b1) = stops[i + 1];

    [
        (r0 + s * (r1 - r0)) as u8,
        (g0 + s * (g1 - g0)) as u8,
        (b0 + s * (b1 - b0)) as u8,
        255,
    ]
}
