//! Nearest-colour search over a working-space palette table.

use crate::vec4::Vec4;

#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("palette is empty")]
    EmptyPalette,
}

/// Returns the index of the palette entry with the smallest squared
/// distance to `query`. Ties go to the lowest index, enforced by only ever
/// replacing the current best on a strict `<`.
pub fn nearest(query: Vec4, palette: &[Vec4]) -> Result<usize, SearchError> {
    let mut best_index = 0usize;
    let mut best_dist = f32::INFINITY;
    let mut seen_any = false;

    for (i, &candidate) in palette.iter().enumerate() {
        let d = query.dist_sq(candidate);
        if !seen_any || d < best_dist {
            best_index = i;
            best_dist = d;
            seen_any = true;
        }
    }

    if seen_any {
        Ok(best_index)
    } else {
        Err(SearchError::EmptyPalette)
    }
}

/// Finds the two nearest palette entries and, if they are close enough to
/// each other relative to the best match, re-queries at a point biased
/// towards the runner-up by `bias`. Used by the ordered/checker threshold
/// dithers to decide which of two close candidates a pixel should round to.
pub fn nearest_two_biased(query: Vec4, palette: &[Vec4], bias: Vec4) -> Result<usize, SearchError> {
    let mut best_index = 0usize;
    let mut best_dist = f32::INFINITY;
    let mut second_index: Option<usize> = None;
    let mut second_dist = f32::INFINITY;
    let mut seen_any = false;

    for (i, &candidate) in palette.iter().enumerate() {
        let d = query.dist_sq(candidate);
        if !seen_any || d < best_dist {
            // demote current best to second, if it still qualifies
            if seen_any && best_dist < second_dist {
                second_index = Some(best_index);
                second_dist = best_dist;
            }
            best_index = i;
            best_dist = d;
            seen_any = true;
        } else if d > best_dist && d < second_dist {
            second_index = Some(i);
            second_dist = d;
        }
    }

    if !seen_any {
        return Err(SearchError::EmptyPalette);
    }

    let Some(second_index) = second_index else {
        return Ok(best_index);
    };

    // Best is more than twice as close (in Euclidean terms) as the runner-up:
    // too far from the palette for a two-way bias to be meaningful.
    if best_dist < 0.25 * second_dist {
        return Ok(best_index);
    }

    let spread = (palette[best_index] - palette[second_index]).abs();
    let biased_query = query + bias * spread;
    nearest(biased_query, palette)
}
