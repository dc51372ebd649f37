//! Labelled positions for training.
//!
//! Sample files hold one `<fen>,<target>` per line, optionally preceded by a
//! `Fen,Result` header. The FEN may contain spaces; the target follows the last comma
//! and must lie in [0, 1] (1 = white wins, 0.5 = draw, 0 = black wins).

use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use crate::error::{PsqtError, Result};
use crate::features::parse_position;

const HEADER: &str = "fen,result";

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub fen: String,
    pub target: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    samples: Vec<Sample>,
}

fn parse_line(line: &str) -> std::result::Result<Sample, String> {
    let (fen, target) = line
        .rsplit_once(',')
        .ok_or_else(|| "missing `,<target>`".to_string())?;
    let fen = fen.trim();
    let target = target.trim();

    let target: f32 = target
        .parse()
        .map_err(|_| format!("invalid target `{}`", target))?;
    if !(0. ..=1.).contains(&target) {
        return Err(format!("target {} outside [0, 1]", target));
    }

    parse_position(fen).map_err(|e| e.to_string())?;

    Ok(Sample { fen: fen.to_string(), target })
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Dataset { samples }
    }

    /// Parses the contents of one sample file. `path` is only used in error messages.
    pub fn parse(path: &Path, content: &str) -> Result<Vec<Sample>> {
        let mut samples = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || (index == 0 && line.eq_ignore_ascii_case(HEADER)) {
                continue;
            }
            let sample = parse_line(line).map_err(|reason| PsqtError::InvalidSample {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            })?;
            samples.push(sample);
        }
        Ok(samples)
    }

    /// Loads a sample file, or every `*.csv` file of a directory in name order.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut files = Vec::new();
        if path.is_dir() {
            for entry in fs::read_dir(path)? {
                let file = entry?.path();
                if file.is_file() && file.extension().is_some_and(|ext| ext == "csv") {
                    files.push(file);
                }
            }
            files.sort();
        } else {
            files.push(path.to_path_buf());
        }

        let mut samples = Vec::new();
        for file in files {
            let content = fs::read_to_string(&file)?;
            let parsed = Dataset::parse(&file, &content)?;
            debug!("Read {} samples from {}", parsed.len(), file.display());
            samples.extend(parsed);
        }
        Ok(Dataset { samples })
    }

    /// Concatenates the samples of several files or directories. Fails if none are found.
    pub fn load_all(paths: &[PathBuf]) -> Result<Self> {
        let mut dataset = Dataset::default();
        for path in paths {
            let loaded = Dataset::load(path)?;
            info!("Loaded {} samples from {}", loaded.len(), path.display());
            dataset.samples.extend(loaded.samples);
        }
        if dataset.is_empty() {
            return Err(PsqtError::EmptyDataset);
        }
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.samples.shuffle(rng);
    }

    /// Shuffles, then holds out `validation_fraction` of the samples (rounded down).
    /// Returns `(train, validation)`.
    pub fn split<R: Rng + ?Sized>(mut self, validation_fraction: f64, rng: &mut R) -> (Dataset, Dataset) {
        self.shuffle(rng);
        let num_validation = (self.samples.len() as f64 * validation_fraction) as usize;
        let validation = self.samples.split_off(self.samples.len() - num_validation);
        (self, Dataset { samples: validation })
    }

    pub fn batches(&self, batch_size: usize) -> std::slice::Chunks<'_, Sample> {
        self.samples.chunks(batch_size)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use super::*;

    const BATCH: &str = "Fen,Result
rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1,0.5
rnbqkbnr/ppp1pppp/8/3p4/5P2/5N2/PPPPP1PP/RNBQKB1R b KQkq - 1 2,1.0

6k1/4Q3/8/8/8/8/1K6/8 b - - 0 1, 0
";

    #[test]
    fn test_parse() {
        let samples = Dataset::parse(Path::new("batch_0.csv"), BATCH).unwrap();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].fen, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(samples[0].target, 0.5);
        assert_eq!(samples[1].target, 1.);
        assert_eq!(samples[2].fen, "6k1/4Q3/8/8/8/8/1K6/8 b - - 0 1");
        assert_eq!(samples[2].target, 0.);
    }

    #[test]
    fn test_parse_without_header() {
        let samples = Dataset::parse(Path::new("x"), "8/8/8/8/8/8/8/K7 w - - 0 1,1").unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_parse_errors_report_line() {
        let cases = [
            ("Fen,Result\n8/8/8/8/8/8/8/K7 w - - 0 1", 2),
            ("8/8/8/8/8/8/8/K7 w - - 0 1,abc", 1),
            ("8/8/8/8/8/8/8/K7 w - - 0 1,1\n8/8/8/8/8/8/8/K7 w - - 0 1,1.5", 2),
            ("8/8/8/8/8/8/8/K7 w - - 0 1,1\n\n8/8/8/8/8/8/8 w - - 0 1,1", 3),
            ("8/8/8/8/8/8/8/K7 x - - 0 1,1", 1),
        ];
        for (content, expected_line) in cases {
            match Dataset::parse(Path::new("bad.csv"), content) {
                Err(PsqtError::InvalidSample { path, line, .. }) => {
                    assert_eq!(path, PathBuf::from("bad.csv"));
                    assert_eq!(line, expected_line, "{}", content);
                }
                other => panic!("Expected InvalidSample for {:?}, got {:?}", content, other),
            }
        }
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("batch_1.csv"), "Fen,Result\n8/8/8/8/8/8/8/K7 b - - 0 1,0\n").unwrap();
        fs::write(dir.path().join("batch_0.csv"), BATCH).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a sample file").unwrap();

        let dataset = Dataset::load(dir.path()).unwrap();
        assert_eq!(dataset.len(), 4);
        // files are read in name order
        assert_eq!(dataset.samples()[3].fen, "8/8/8/8/8/8/8/K7 b - - 0 1");
    }

    #[test]
    fn test_load_all_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "Fen,Result\n").unwrap();

        assert!(matches!(Dataset::load_all(&[path]), Err(PsqtError::EmptyDataset)));
    }

    #[test]
    fn test_split() {
        let samples: Vec<Sample> = (0..100)
            .map(|i| Sample { fen: "8/8/8/8/8/8/8/8 w - - 0 1".to_string(), target: i as f32 / 100. })
            .collect();
        let mut rng = StdRng::seed_from_u64(42);

        let (train, validation) = Dataset::new(samples).split(0.1, &mut rng);
        assert_eq!(train.len(), 90);
        assert_eq!(validation.len(), 10);

        let mut targets: Vec<f32> = train.samples().iter().chain(validation.samples()).map(|s| s.target).collect();
        targets.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(targets, (0..100).map(|i| i as f32 / 100.).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_without_validation() {
        let dataset = Dataset::new(vec![Sample { fen: "8/8/8/8/8/8/8/8 w - - 0 1".to_string(), target: 1. }]);
        let (train, validation) = dataset.split(0., &mut StdRng::seed_from_u64(0));
        assert_eq!(train.len(), 1);
        assert!(validation.is_empty());
    }

    #[test]
    fn test_batches() {
        let dataset = Dataset::new(vec![Sample { fen: "8/8/8/8/8/8/8/8 w - - 0 1".to_string(), target: 1. }; 10]);
        let sizes: Vec<usize> = dataset.batches(4).map(|b| b.len()).collect();
        assert_eq!(sizes, [4, 4, 2]);
    }
}
