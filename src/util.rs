use std::{collections::TryReserveError, fmt::Display};

/// Allocates a vector of `len` default values, reporting allocation failure instead of aborting.
#[inline]
pub fn try_filled_vec<T: Clone + Default>(len: usize) -> Result<Vec<T>, TryReserveError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, T::default());

    Ok(v)
}

/// Allocates an empty vector with room for exactly `capacity` items.
#[inline]
pub fn try_with_capacity<T>(capacity: usize) -> Result<Vec<T>, TryReserveError> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)?;

    Ok(v)
}

/// Formats a slice as `label:\n[a, b, c]`. The label line is omitted when `label` is `None`.
pub fn format_vector<T: Display>(values: &[T], label: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(label) = label {
        out.push_str(label);
        out.push_str(":\n");
    }

    out.push('[');
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&v.to_string());
    }
    out.push(']');

    out
}

pub fn print_vector<T: Display>(values: &[T], label: Option<&str>) {
    println!("{}", format_vector(values, label));
}
