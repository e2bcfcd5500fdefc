//! On disk cache of outcome tables.
//!
//! The file layout, all integers little endian:
//!
//! ```text
//! magic        4 bytes   b"VPOT"
//! version      u32
//! slots        u32
//! titles       slots x u8    pay title ordinals in slot order
//! tier 0..=4   C(52, h) x slots x u32
//! tier 5       C(52, 5) x u8 0 for no title, otherwise slot + 1
//! ```

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::{DECK_SIZE, HAND_SIZE, binomial};
use crate::pay::{PayTable, PayTitle};

use super::OutcomeTable;

/// Environment variable naming the cache directory.
pub const CACHE_DIR_ENV: &str = "VIDEO_POKER_CACHE_DIR";

const MAGIC: &[u8; 4] = b"VPOT";
const FORMAT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("Not an outcome table file")]
    BadMagic,
    #[error("Outcome table format version {found} is not supported, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Outcome table has the wrong shape: {0}")]
    ShapeMismatch(String),
    #[error("Outcome table was built for a different pay table")]
    PayTableMismatch,
    #[error("Unable to encode the pay table: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A directory of cached outcome tables, one file per pay table.
///
/// The file name only identifies the pay table and the judges label. The
/// judge functions themselves cannot be hashed, so tables built with a
/// custom `JudgeRegistry` must be given their own label with
/// [`TableCache::with_judges`], or they share files with the standard judges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCache {
    dir: PathBuf,
    judges: Option<String>,
}

impl TableCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            judges: None,
        }
    }

    /// Use `VIDEO_POKER_CACHE_DIR`, or the working directory when unset.
    pub fn from_env() -> Self {
        Self::new(std::env::var_os(CACHE_DIR_ENV).unwrap_or_else(|| ".".into()))
    }

    /// Label the judge functions the cached tables are built with.
    pub fn with_judges(mut self, label: impl Into<String>) -> Self {
        self.judges = Some(label.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Hex SHA-256 of the ordered pay table entries, the judges label and
    /// the format version. Tables that differ in any payout or in priority
    /// order get different keys.
    pub fn key(&self, pay_table: &PayTable) -> Result<String, CacheError> {
        let encoded = serde_json::to_vec(&(
            FORMAT_VERSION,
            self.judges.as_deref(),
            pay_table.entries(),
        ))?;
        Ok(format!("{:x}", Sha256::digest(&encoded)))
    }

    pub fn path_for(&self, pay_table: &PayTable) -> Result<PathBuf, CacheError> {
        Ok(self
            .dir
            .join(format!("outcome_table_{}.bin", self.key(pay_table)?)))
    }

    pub fn load(&self, pay_table: &PayTable) -> Result<OutcomeTable, CacheError> {
        let file = File::open(self.path_for(pay_table)?)?;
        read_table(&mut BufReader::new(file), pay_table)
    }

    /// Write the table next to its final name and then move it into place,
    /// so readers never see half a file.
    pub fn store(&self, pay_table: &PayTable, table: &OutcomeTable) -> Result<PathBuf, CacheError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(pay_table)?;
        let partial = path.with_extension("bin.partial");
        {
            let mut writer = BufWriter::new(File::create(&partial)?);
            write_table(&mut writer, table)?;
            writer.flush()?;
        }
        fs::rename(&partial, &path)?;
        Ok(path)
    }
}

pub fn write_table<W: Write>(writer: &mut W, table: &OutcomeTable) -> Result<(), CacheError> {
    writer.write_all(MAGIC)?;
    writer.write_u32::<LittleEndian>(FORMAT_VERSION)?;
    writer.write_u32::<LittleEndian>(table.titles().len() as u32)?;
    for title in table.titles() {
        writer.write_u8(title.index() as u8)?;
    }
    for held in 0..HAND_SIZE {
        for count in table.tier(held) {
            writer.write_u32::<LittleEndian>(*count)?;
        }
    }
    writer.write_all(table.full_hands())?;
    Ok(())
}

/// Read a table and check it against the pay table it is meant for.
pub fn read_table<R: Read>(reader: &mut R, pay_table: &PayTable) -> Result<OutcomeTable, CacheError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(CacheError::BadMagic);
    }
    let version = reader.read_u32::<LittleEndian>()?;
    if version != FORMAT_VERSION {
        return Err(CacheError::UnsupportedVersion {
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    let slots = reader.read_u32::<LittleEndian>()? as usize;
    if slots != pay_table.len() {
        return Err(CacheError::PayTableMismatch);
    }
    let mut titles = Vec::with_capacity(slots);
    for expected in pay_table.titles() {
        let ordinal = reader.read_u8()? as usize;
        match PayTitle::from_index(ordinal) {
            Some(title) if title == expected => titles.push(title),
            _ => return Err(CacheError::PayTableMismatch),
        }
    }

    let mut counts: [Vec<u32>; HAND_SIZE] = Default::default();
    for (held, tier) in counts.iter_mut().enumerate() {
        *tier = vec![0; binomial(DECK_SIZE, held) * slots];
        reader.read_u32_into::<LittleEndian>(tier)?;
    }
    let mut full_hands = vec![0u8; binomial(DECK_SIZE, HAND_SIZE)];
    reader.read_exact(&mut full_hands)?;

    let mut trailing = [0u8; 1];
    if reader.read(&mut trailing)? != 0 {
        return Err(CacheError::ShapeMismatch("trailing bytes after the last tier".into()));
    }

    OutcomeTable::from_parts(titles, counts, full_hands)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_util::{jacks_or_better_calculator, jacks_or_better_table};

    #[test]
    fn test_key_depends_on_payouts_and_order() {
        let cache = TableCache::new(".");
        let nine_six = cache.key(&PayTable::jacks_or_better_9_6()).unwrap();
        let eight_five = cache.key(&PayTable::jacks_or_better_8_5()).unwrap();
        assert_eq!(64, nine_six.len());
        assert!(nine_six.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(nine_six, eight_five);
        assert_eq!(nine_six, cache.key(&PayTable::jacks_or_better_9_6()).unwrap());
        // The directory is not part of the key.
        assert_eq!(
            nine_six,
            TableCache::new("/elsewhere")
                .key(&PayTable::jacks_or_better_9_6())
                .unwrap()
        );

        let mut reversed: Vec<(PayTitle, u32)> = PayTable::jacks_or_better_9_6()
            .entries()
            .iter()
            .map(|e| (e.title, e.payout))
            .collect();
        reversed.reverse();
        let reversed = PayTable::new(reversed).unwrap();
        assert_ne!(nine_six, cache.key(&reversed).unwrap());
    }

    #[test]
    fn test_key_depends_on_judges_label() {
        let pay_table = PayTable::jacks_or_better_9_6();
        let standard = TableCache::new(".");
        let custom = TableCache::new(".").with_judges("no straights");
        let other = TableCache::new(".").with_judges("loose flushes");
        assert_ne!(standard.key(&pay_table).unwrap(), custom.key(&pay_table).unwrap());
        assert_ne!(custom.key(&pay_table).unwrap(), other.key(&pay_table).unwrap());
        assert_eq!(
            custom.key(&pay_table).unwrap(),
            TableCache::new(".")
                .with_judges("no straights")
                .key(&pay_table)
                .unwrap()
        );
    }

    #[test]
    fn test_labelled_cache_does_not_reuse_standard_tables() {
        let dir = tempfile::tempdir().unwrap();
        let pay_table = PayTable::jacks_or_better_9_6();
        let standard = TableCache::new(dir.path());
        standard.store(&pay_table, &jacks_or_better_table()).unwrap();

        let custom = TableCache::new(dir.path()).with_judges("no straights");
        assert_ne!(
            standard.path_for(&pay_table).unwrap(),
            custom.path_for(&pay_table).unwrap()
        );
        match custom.load(&pay_table) {
            Err(CacheError::Io(e)) => assert_eq!(io::ErrorKind::NotFound, e.kind()),
            other => panic!("expected a missing file, got {other:?}"),
        }
    }

    #[test_log::test]
    fn test_round_trip_through_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TableCache::new(dir.path());
        let table = jacks_or_better_table();
        let pay_table = PayTable::jacks_or_better_9_6();

        let path = cache.store(&pay_table, &table).unwrap();
        assert!(path.exists());
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("outcome_table_")
        );

        let loaded = cache.load(&pay_table).unwrap();
        assert_eq!(*table, loaded);

        // A warm cache is used instead of rebuilding.
        let calc = jacks_or_better_calculator();
        let shared = OutcomeTable::load_or_build(&calc, Some(&cache));
        assert_eq!(*table, *shared);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TableCache::new(dir.path());
        match cache.load(&PayTable::jacks_or_better_9_6()) {
            Err(CacheError::Io(e)) => assert_eq!(io::ErrorKind::NotFound, e.kind()),
            other => panic!("expected a missing file, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_corruption() {
        let table = jacks_or_better_table();
        let pay_table = PayTable::jacks_or_better_9_6();
        let mut bytes = Vec::new();
        write_table(&mut bytes, &table).unwrap();

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(matches!(
            read_table(&mut bad_magic.as_slice(), &pay_table),
            Err(CacheError::BadMagic)
        ));

        let mut bad_version = bytes.clone();
        bad_version[4] = 9;
        assert!(matches!(
            read_table(&mut bad_version.as_slice(), &pay_table),
            Err(CacheError::UnsupportedVersion { found: 9, .. })
        ));

        // Payouts only pick the file. The stored counts depend on the titles.
        assert!(read_table(&mut bytes.as_slice(), &PayTable::jacks_or_better_8_5()).is_ok());
        assert!(matches!(
            read_table(&mut bytes.as_slice(), &PayTable::deuces_wild_full_pay()),
            Err(CacheError::PayTableMismatch)
        ));

        let truncated = &bytes[..bytes.len() - 10];
        assert!(matches!(
            read_table(&mut &truncated[..], &pay_table),
            Err(CacheError::Io(_))
        ));

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(matches!(
            read_table(&mut trailing.as_slice(), &pay_table),
            Err(CacheError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_corrupt_cache_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TableCache::new(dir.path());
        let pay_table = PayTable::jacks_or_better_9_6();
        fs::write(cache.path_for(&pay_table).unwrap(), b"not a table").unwrap();

        let calc = jacks_or_better_calculator();
        let rebuilt: Arc<OutcomeTable> = OutcomeTable::load_or_build(&calc, Some(&cache));
        assert_eq!(*jacks_or_better_table(), *rebuilt);
        // The rebuild replaced the corrupt file.
        assert!(cache.load(&pay_table).is_ok());
    }
}
