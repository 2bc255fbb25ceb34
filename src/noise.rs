//! Small deterministic 3-D value noise for the aurora and wave patterns.

fn hash_u32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846ca68b);
    x ^= x >> 16;
    x
}

fn hash3(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    hash_u32(
        seed ^ (x as u32).wrapping_mul(0x9e3779b1)
            ^ (y as u32).wrapping_mul(0x85ebca6b)
            ^ (z as u32).wrapping_mul(0xc2b2ae35),
    )
}

fn rand01(h: u32) -> f32 {
    ((h & 0x00ff_ffff) as f32) / 16_777_215.0
}

fn fade(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Seeded lattice value noise over three dimensions.
#[derive(Clone, Copy)]
pub struct Noise3 {
    seed: u32,
}

impl Noise3 {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Sample in [-1, 1].
    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let xi = x.floor() as i32;
        let yi = y.floor() as i32;
        let zi = z.floor() as i32;
        let u = fade(x - xi as f32);
        let v = fade(y - yi as f32);
        let w = fade(z - zi as f32);

        let mut corners = [0.0f32; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let dx = (i & 1) as i32;
            let dy = ((i >> 1) & 1) as i32;
            let dz = ((i >> 2) & 1) as i32;
            *corner = rand01(hash3(xi + dx, yi + dy, zi + dz, self.seed));
        }

        let x0 = lerp(corners[0], corners[1], u);
        let x1 = lerp(corners[2], corners[3], u);
        let x2 = lerp(corners[4], corners[5], u);
        let x3 = lerp(corners[6], corners[7], u);
        let y0 = lerp(x0, x1, v);
        let y1 = lerp(x2, x3, v);

        lerp(y0, y1, w) * 2.0 - 1.0
    }

    /// Multi-octave sum, normalized back to [0, 1].
    pub fn fractal(&self, x: f32, y: f32, z: f32, octaves: u32, persistence: f32, lacunarity: f32) -> f32 {
        let mut value = 0.0;
        let mut total = 0.0;
        let mut amp = 1.0;
        let mut freq = 1.0;

        for _ in 0..octaves {
            value += self.sample(x * freq, y * freq, z * freq) * amp;
            total += amp;
            amp *= persistence;
            freq *= lacunarity;
        }

        (value / total + 1.0) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_stays_in_range() {
        let noise = Noise3::new(7);
        for i in 0..500 {
            let t = i as f32 * 0.173;
            let v = noise.sample(t, t * 0.7, t * 1.3);
            assert!((-1.0..=1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn seeded_sampling_is_deterministic() {
        let a = Noise3::new(42);
        let b = Noise3::new(42);
        let c = Noise3::new(43);
        assert_eq!(a.sample(1.5, 2.5, 3.5), b.sample(1.5, 2.5, 3.5));
        assert_ne!(a.sample(1.5, 2.5, 3.5), c.sample(1.5, 2.5, 3.5));
    }

    #[test]
    fn fractal_varies_smoothly() {
        let noise = Noise3::new(1);
        let a = noise.fractal(0.50, 0.5, 0.0, 3, 0.5, 2.0);
        let b = noise.fractal(0.51, 0.5, 0.0, 3, 0.5, 2.0);
        assert!((a - b).abs() < 0.1);
    }
}
