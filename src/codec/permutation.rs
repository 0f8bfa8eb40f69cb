// src/codec/permutation.rs - Bit position remapping
use std::{fmt, fs, io, path::Path, str::FromStr};

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CodecError;

/// Widest table supported; `2^63` still fits in a `u64` identifier domain.
pub const MAX_BIT_WIDTH: usize = 63;

/// Default number of bit positions shuffled by the codec
pub const DEFAULT_BIT_WIDTH: usize = 30;

/// A permutation of `N` bit positions.
///
/// Entry `i` is the output position of input bit `i`. The same table drives
/// both directions: [`PermutationTable::encode`] reads bit `i` and writes bit
/// `table[i]`, [`PermutationTable::decode`] reads bit `table[i]` and writes
/// bit `i`. This round-trips for any permutation, self-inverse or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct PermutationTable {
    positions: Vec<u8>,
}

impl PermutationTable {
    /// Builds a table after checking that `positions` is a permutation of `0..N`
    pub fn new(positions: Vec<u8>) -> Result<Self, CodecError> {
        let width = positions.len();
        if width == 0 || width > MAX_BIT_WIDTH {
            return Err(CodecError::InvalidTable(format!(
                "width must be between 1 and {}, got {}",
                MAX_BIT_WIDTH, width
            )));
        }

        let mut seen = [false; MAX_BIT_WIDTH];
        for &position in &positions {
            let slot = position as usize;
            if slot >= width {
                return Err(CodecError::InvalidTable(format!(
                    "position {} is outside 0..{}",
                    position, width
                )));
            }
            if seen[slot] {
                return Err(CodecError::InvalidTable(format!(
                    "position {} appears more than once",
                    position
                )));
            }
            seen[slot] = true;
        }

        Ok(Self { positions })
    }

    /// The reference table `[N-1, N-2, ..., 0]`
    pub fn reversed(width: usize) -> Result<Self, CodecError> {
        Self::new((0..width).rev().map(|p| p as u8).collect())
    }

    /// Shuffles `0..N` with the given RNG.
    ///
    /// Only meant for one-time provisioning: every token issued under a table
    /// becomes undecodable once the table is replaced.
    pub fn generate<R: Rng + ?Sized>(width: usize, rng: &mut R) -> Result<Self, CodecError> {
        let mut positions: Vec<u8> = (0..width).map(|p| p as u8).collect();
        positions.shuffle(rng);
        Self::new(positions)
    }

    /// Reads a table persisted as a JSON array
    pub fn load(path: &Path) -> Result<Self, CodecError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CodecError::InvalidTable(format!("could not read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            CodecError::InvalidTable(format!("could not parse {}: {}", path.display(), e))
        })
    }

    /// Writes the table as a JSON array
    pub fn save(&self, path: &Path) -> Result<(), CodecError> {
        let content = serde_json::to_string(self)
            .map_err(|e| CodecError::InvalidTable(format!("could not serialize table: {}", e)))?;
        fs::write(path, content).map_err(|e| {
            CodecError::InvalidTable(format!("could not write {}: {}", path.display(), e))
        })
    }

    /// Persists the table at `path` unless one is already there.
    ///
    /// The table is written under a temporary name and hard-linked into
    /// place, so concurrent provisioners settle on a single table and readers
    /// never see a partial file. Returns the table that ended up at `path`.
    pub fn save_new(&self, path: &Path) -> Result<Self, CodecError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("table");
        let staging = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));
        self.save(&staging)?;

        let published = fs::hard_link(&staging, path);
        let _ = fs::remove_file(&staging);

        match published {
            Ok(()) => Ok(self.clone()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Self::load(path),
            Err(e) => Err(CodecError::InvalidTable(format!(
                "could not publish {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Number of bit positions, `N`
    pub fn width(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[u8] {
        &self.positions
    }

    /// Moves bit `i` of `n` to bit `table[i]`. Bits at or above `N` are dropped.
    pub fn encode(&self, n: u64) -> u64 {
        self.positions
            .iter()
            .enumerate()
            .filter(|&(i, _)| n & (1 << i) != 0)
            .fold(0, |acc, (_, &dst)| acc | (1 << dst))
    }

    /// Moves bit `table[i]` of `n` back to bit `i`. Bits at or above `N` are dropped.
    pub fn decode(&self, n: u64) -> u64 {
        self.positions
            .iter()
            .enumerate()
            .filter(|&(_, &src)| n & (1 << src) != 0)
            .fold(0, |acc, (i, _)| acc | (1 << i))
    }
}

impl TryFrom<Vec<u8>> for PermutationTable {
    type Error = CodecError;

    fn try_from(positions: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(positions)
    }
}

impl From<PermutationTable> for Vec<u8> {
    fn from(table: PermutationTable) -> Self {
        table.positions
    }
}

// Comma separated list, e.g. "2,0,1"
impl FromStr for PermutationTable {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let positions = s
            .split(',')
            .map(|part| {
                part.trim().parse::<u8>().map_err(|e| {
                    CodecError::InvalidTable(format!("invalid position '{}': {}", part.trim(), e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(positions)
    }
}

impl fmt::Display for PermutationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.positions.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn temp_table_path() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("table-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn test_rejects_non_permutations() {
        assert!(PermutationTable::new(vec![]).is_err());
        assert!(PermutationTable::new(vec![0, 0, 1]).is_err()); // duplicate
        assert!(PermutationTable::new(vec![0, 1, 3]).is_err()); // gap
        assert!(PermutationTable::new((0..64).collect()).is_err()); // too wide
        assert!(PermutationTable::new(vec![2, 0, 1]).is_ok());
    }

    #[test]
    fn test_reversed_table_moves_low_bits_high() {
        let table = PermutationTable::reversed(30).unwrap();
        assert_eq!(table.positions()[0], 29);
        assert_eq!(table.encode(1), 1 << 29);
        assert_eq!(table.encode(2), 1 << 28);
        assert_eq!(table.decode(1 << 29), 1);
        assert_eq!(table.encode(0), 0);
    }

    #[test]
    fn test_decode_inverts_encode_for_non_involution() {
        // 0 -> 1 -> 2 -> 0 is not its own inverse
        let table = PermutationTable::new(vec![1, 2, 0]).unwrap();
        assert_eq!(table.encode(0b001), 0b010);
        assert_eq!(table.decode(0b010), 0b001);
        for n in 0..8 {
            assert_eq!(table.decode(table.encode(n)), n);
        }
    }

    #[test]
    fn test_generated_table_round_trips() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = PermutationTable::generate(30, &mut rng).unwrap();
        assert_eq!(table.width(), 30);

        let mut sorted = table.positions().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..30).collect::<Vec<u8>>());

        for n in (0..(1u64 << 30)).step_by(99_991) {
            assert_eq!(table.decode(table.encode(n)), n);
        }
    }

    #[test]
    fn test_generation_is_reproducible_for_a_seed() {
        let a = PermutationTable::generate(30, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = PermutationTable::generate(30, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_high_bits_are_dropped() {
        let table = PermutationTable::reversed(4).unwrap();
        assert_eq!(table.encode(0b1_0001), 0b1000);
    }

    #[test]
    fn test_parse_and_display() {
        let table: PermutationTable = "2, 0,1".parse().unwrap();
        assert_eq!(table.positions(), &[2, 0, 1]);
        assert_eq!(table.to_string(), "2,0,1");
        assert!("2,x,1".parse::<PermutationTable>().is_err());
        assert!("1,1".parse::<PermutationTable>().is_err());
    }

    #[test]
    fn test_serde_validates_on_load() {
        let table: PermutationTable = serde_json::from_str("[1,0,2]").unwrap();
        assert_eq!(serde_json::to_string(&table).unwrap(), "[1,0,2]");
        assert!(serde_json::from_str::<PermutationTable>("[1,1,2]").is_err());
    }

    #[test]
    fn test_save_new_keeps_existing_table() {
        let path = temp_table_path();
        let first = PermutationTable::generate(30, &mut StdRng::seed_from_u64(1)).unwrap();
        let second = PermutationTable::generate(30, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_ne!(first, second);

        assert_eq!(first.save_new(&path).unwrap(), first);
        // A later provisioner adopts the table already on disk
        assert_eq!(second.save_new(&path).unwrap(), first);
        let on_disk = PermutationTable::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(on_disk, first);
    }

    #[test]
    fn test_concurrent_save_new_agrees_on_one_table() {
        let path = temp_table_path();
        let handles: Vec<_> = (0..8u64)
            .map(|seed| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let table =
                        PermutationTable::generate(30, &mut StdRng::seed_from_u64(seed)).unwrap();
                    table.save_new(&path).unwrap()
                })
            })
            .collect();

        let tables: Vec<PermutationTable> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        let on_disk = PermutationTable::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(tables.iter().all(|t| *t == on_disk));
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_table_path();
        let table = PermutationTable::generate(30, &mut StdRng::seed_from_u64(3)).unwrap();

        table.save(&path).unwrap();
        let loaded = PermutationTable::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, table);
    }
}
