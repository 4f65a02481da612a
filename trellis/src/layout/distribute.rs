//! Shared stretch distribution logic.
//!
//! Box panels, grid tracks and responsive-grid rows all split space the same
//! way: fixed entries keep their length, stretch entries share whatever is
//! left after fixed entries and reserved space (margins, gutters) in
//! proportion to their coefficients.

/// Input for stretch distribution: either a fixed length or a coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StretchInput {
    /// Fixed length (already measured and clamped).
    Fixed(f32),
    /// Stretch coefficient.
    Stretch(f32),
}

impl StretchInput {
    pub fn is_stretch(&self) -> bool {
        matches!(self, StretchInput::Stretch(_))
    }
}

/// Allocation result for a single entry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StretchAllocation {
    /// Allocated length.
    pub size: f32,
    /// Whether this entry stretched (vs fixed).
    pub is_stretch: bool,
}

/// Totals computed by the first pass of `distribute_stretch`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StretchTotals {
    pub fixed: f32,
    pub coefficients: f32,
    /// Space left for stretch entries, never negative.
    pub free: f32,
}

/// Distribute `available` among `inputs`.
///
/// `reserved` is subtracted from the available length before sharing
/// (margins, gutters). Stretch entries receive
/// `free * coefficient / total_coefficient`, or zero when the total is zero.
pub fn distribute_stretch(
    inputs: impl IntoIterator<Item = StretchInput>,
    available: f32,
    reserved: f32,
) -> (Vec<StretchAllocation>, StretchTotals) {
    // First pass: collect inputs and compute totals
    let inputs: Vec<StretchInput> = inputs.into_iter().collect();
    let mut totals = StretchTotals::default();
    for input in &inputs {
        match *input {
            StretchInput::Fixed(size) => totals.fixed += size,
            StretchInput::Stretch(coefficient) => totals.coefficients += coefficient,
        }
    }

    let free = available - totals.fixed - reserved;
    if free < 0.0 {
        tracing::trace!(available, fixed = totals.fixed, reserved, "negative free space, clamped");
    }
    totals.free = free.max(0.0);

    // Second pass: compute allocations
    let allocations = inputs
        .into_iter()
        .map(|input| match input {
            StretchInput::Fixed(size) => StretchAllocation {
                size,
                is_stretch: false,
            },
            StretchInput::Stretch(coefficient) => {
                let size = if totals.coefficients > 0.0 {
                    totals.free * coefficient / totals.coefficients
                } else {
                    0.0
                };
                StretchAllocation {
                    size,
                    is_stretch: true,
                }
            }
        })
        .collect();

    (allocations, totals)
}

/// Cumulative offsets of `sizes`: `result[0] = 0`, `result[i+1] = result[i] + sizes[i]`.
///
/// The extent of cells `[start, end)` is `result[end] - result[start]`.
pub fn partial_sums(sizes: &[f32]) -> Vec<f32> {
    let mut sums = Vec::with_capacity(sizes.len() + 1);
    let mut running = 0.0;
    sums.push(running);
    for size in sizes {
        running += size;
        sums.push(running);
    }
    sums
}
