use crate::sample::Example;
use npyz::{DType, Field, TypeStr};

/// Serialized width of one [`TrainingRow`], in bytes.
pub const ROW_BYTES: u64 = 64 + 64 + 64 + 1 + 1;

/// One persisted training example.
///
/// Matches the NumPy structured dtype
/// `[('x','|i1',(64,)), ('xp','|i1',(64,)), ('xr','|i1',(64,)), ('m','|i1'), ('y','|i1')]`,
/// so a whole dataset loads as five named, row-aligned columns.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, npyz::Serialize, npyz::Deserialize, npyz::AutoSerialize)]
pub struct TrainingRow {
    pub x: [i8; 64],
    pub xp: [i8; 64],
    pub xr: [i8; 64],
    pub m: i8,
    pub y: i8,
}

impl TrainingRow {
    /// NumPy dtype descriptor for the row.
    pub fn dtype() -> DType {
        let i1: TypeStr = "|i1".parse().unwrap();
        DType::Record(vec![
            Field {
                name: "x".into(),
                dtype: DType::Array(64, Box::new(DType::Plain(i1.clone()))),
            },
            Field {
                name: "xp".into(),
                dtype: DType::Array(64, Box::new(DType::Plain(i1.clone()))),
            },
            Field {
                name: "xr".into(),
                dtype: DType::Array(64, Box::new(DType::Plain(i1.clone()))),
            },
            Field {
                name: "m".into(),
                dtype: DType::Plain(i1.clone()),
            },
            Field {
                name: "y".into(),
                dtype: DType::Plain(i1),
            },
        ])
    }
}

impl From<&Example> for TrainingRow {
    fn from(example: &Example) -> Self {
        TrainingRow {
            x: example.x,
            xp: example.x_parent,
            xr: example.x_random,
            // same one-byte column as the other fields; games deeper than
            // 127 plies from the sampled node wrap like a NumPy int8 cast
            m: example.moves_left as i8,
            y: example.y,
        }
    }
}
