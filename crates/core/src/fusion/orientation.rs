//! Sensor-to-body orientation mapping for the motion processor.
//!
//! The motion processor takes its mounting orientation as a single packed
//! scalar: one 3-bit code per output row, row 0 in the low bits. The bit
//! layout is a fixed external contract with the vendor firmware and must
//! not change.

/// A 3x3 signed axis permutation matrix.
///
/// Entries are restricted to {-1, 0, +1} with exactly one nonzero entry
/// per row and per column. Row `i` selects which sensor axis (and sign)
/// feeds body axis `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationMatrix(pub [[i8; 3]; 3]);

impl OrientationMatrix {
    /// Sensor axes aligned with body axes (the default mounting).
    pub const IDENTITY: Self = Self([[1, 0, 0], [0, 1, 0], [0, 0, 1]]);

    /// Encode the matrix into the packed scalar the motion processor's
    /// configuration call consumes.
    ///
    /// Each row independently maps to a 3-bit code (0-6 for the six valid
    /// axis/sign combinations), packed at bit offsets 0, 3, and 6. A row
    /// with no nonzero entry is a configuration error; startup must halt
    /// on it rather than proceed with a meaningless orientation.
    pub fn encode(&self) -> Result<OrientationCode, OrientationError> {
        let mut scalar: u16 = 0;
        for (i, row) in self.0.iter().enumerate() {
            let code = row_to_code(row);
            if code == OrientationCode::ROW_INVALID {
                return Err(OrientationError::DegenerateRow { row: i });
            }
            scalar |= code << (3 * i as u16);
        }
        Ok(OrientationCode(scalar))
    }
}

/// Per-row detection, first match wins.
///
/// The order (axis 0 positive, axis 0 negative, axis 1 positive, ...) only
/// matters for degenerate inputs with more than one nonzero entry, which
/// must not crash.
fn row_to_code(row: &[i8; 3]) -> u16 {
    if row[0] > 0 {
        0
    } else if row[0] < 0 {
        4
    } else if row[1] > 0 {
        1
    } else if row[1] < 0 {
        5
    } else if row[2] > 0 {
        2
    } else if row[2] < 0 {
        6
    } else {
        OrientationCode::ROW_INVALID
    }
}

/// The packed orientation scalar (9 useful bits).
///
/// Derived once from an [`OrientationMatrix`] at startup configuration
/// time and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationCode(u16);

impl OrientationCode {
    /// Reserved per-row code signalling "no nonzero entry found".
    pub const ROW_INVALID: u16 = 7;

    /// Code for [`OrientationMatrix::IDENTITY`] (rows X+, Y+, Z+).
    pub const IDENTITY: Self = Self(0b010_001_000);

    /// The raw scalar handed to the motion-processor configuration call.
    pub fn value(self) -> u16 {
        self.0
    }

    /// Extract the 3-bit sub-code for one row (0..=2).
    pub fn row_code(self, row: usize) -> u16 {
        (self.0 >> (3 * row)) & 0b111
    }
}

/// Orientation configuration errors. Fatal at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationError {
    /// A matrix row has no nonzero entry
    DegenerateRow {
        /// Index of the offending row (0..=2)
        row: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_matrix_encodes_to_known_scalar() {
        let code = OrientationMatrix::IDENTITY.encode().unwrap();
        assert_eq!(code.value(), 0b010_001_000);
        assert_eq!(code, OrientationCode::IDENTITY);
    }

    #[test]
    fn row_codes_follow_vendor_convention() {
        // X+ -> 0, Y+ -> 1, Z+ -> 2, X- -> 4, Y- -> 5, Z- -> 6
        assert_eq!(row_to_code(&[1, 0, 0]), 0);
        assert_eq!(row_to_code(&[0, 1, 0]), 1);
        assert_eq!(row_to_code(&[0, 0, 1]), 2);
        assert_eq!(row_to_code(&[-1, 0, 0]), 4);
        assert_eq!(row_to_code(&[0, -1, 0]), 5);
        assert_eq!(row_to_code(&[0, 0, -1]), 6);
    }

    #[test]
    fn degenerate_row_is_rejected() {
        let m = OrientationMatrix([[1, 0, 0], [0, 0, 0], [0, 0, 1]]);
        assert_eq!(m.encode(), Err(OrientationError::DegenerateRow { row: 1 }));

        let all_zero = OrientationMatrix([[0; 3]; 3]);
        assert_eq!(
            all_zero.encode(),
            Err(OrientationError::DegenerateRow { row: 0 })
        );
    }

    #[test]
    fn multiple_nonzero_entries_take_first_match_without_panic() {
        // Degenerate input: axis 0 wins by detection order
        let m = OrientationMatrix([[1, -1, 0], [0, 1, 0], [0, 0, 1]]);
        let code = m.encode().unwrap();
        assert_eq!(code.row_code(0), 0);
    }

    /// All 24 proper signed-permutation matrices must encode to distinct
    /// scalars whose per-row fields recover the original axis/sign choice.
    #[test]
    fn proper_rotations_encode_distinctly_and_roundtrip() {
        let perms: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        let mut codes: heapless::Vec<u16, 24> = heapless::Vec::new();

        for perm in perms {
            for signs in 0..8u8 {
                let sign = |bit: u8| if signs & (1 << bit) != 0 { -1i8 } else { 1i8 };
                let mut m = [[0i8; 3]; 3];
                for (row, &axis) in perm.iter().enumerate() {
                    m[row][axis] = sign(row as u8);
                }

                // Proper rotations only: determinant +1
                if det(&m) != 1 {
                    continue;
                }

                let code = OrientationMatrix(m).encode().unwrap();
                assert!(
                    !codes.contains(&code.value()),
                    "duplicate code {:#05b} for matrix {:?}",
                    code.value(),
                    m
                );
                codes.push(code.value()).unwrap();

                // Round trip: each row field recovers axis and sign
                for (row, &axis) in perm.iter().enumerate() {
                    let field = code.row_code(row);
                    assert_eq!(field & 0b011, axis as u16);
                    let negative = field & 0b100 != 0;
                    assert_eq!(negative, m[row][axis] < 0);
                }
            }
        }

        assert_eq!(codes.len(), 24);
    }

    fn det(m: &[[i8; 3]; 3]) -> i32 {
        let m = m.map(|r| r.map(i32::from));
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }
}
