use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("Leaderboard file error: {0}")]
    Io(#[from] std::io::Error),
}

/// One ranked result returned by [`Leaderboard::top_times`].
#[derive(Clone, Debug, PartialEq)]
pub struct RankedTime {
    /// 1-based position within the difficulty
    pub rank: usize,
    pub name: String,
    pub secs: f64,
}

/// Append-only store of finished games, one `difficulty,name,seconds` line
/// per record.
#[derive(Clone, Debug)]
pub struct Leaderboard {
    path: PathBuf,
}

impl Leaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append a finished game. The file is created on first use.
    pub fn record(
        &self,
        difficulty: &str,
        player: &str,
        secs: f64,
    ) -> std::result::Result<(), LeaderboardError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{},{},{}", difficulty, player, secs)?;
        Ok(())
    }

    /// The 5 fastest times recorded for `difficulty`, ascending. A missing
    /// file simply means no records yet.
    pub fn top_times(
        &self,
        difficulty: &str,
    ) -> std::result::Result<Vec<RankedTime>, LeaderboardError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut times: Vec<(f64, String)> = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.splitn(3, ',');
            let (Some(label), Some(name), Some(secs)) =
                (fields.next(), fields.next(), fields.next())
            else {
                log::warn!("Skipping malformed leaderboard line: {:?}", line);
                continue;
            };
            if label != difficulty {
                continue;
            }
            let Ok(secs) = secs.parse::<f64>() else {
                log::warn!("Skipping leaderboard line with bad time: {:?}", line);
                continue;
            };
            times.push((secs, name.to_string()));
        }

        // ties break by name, like sorting (time, name) pairs
        times.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        Ok(times
            .into_iter()
            .take(5)
            .enumerate()
            .map(|(index, (secs, name))| RankedTime {
                rank: index + 1,
                name,
                secs,
            })
            .collect())
    }
}
