use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Generate a reproducible matrix of uniform values in [-1, 1), one item per row
pub fn generate_random_matrix(num_rows: usize, dimension: usize, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((num_rows, dimension), |_| rng.gen_range(-1.0..1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_matrix_is_seeded() {
        let a = generate_random_matrix(4, 3, 9);
        let b = generate_random_matrix(4, 3, 9);
        assert_eq!(a.shape(), &[4, 3]);
        assert_eq!(a, b);
        assert!(a.iter().all(|x| (-1.0..1.0).contains(x)));
    }
}
