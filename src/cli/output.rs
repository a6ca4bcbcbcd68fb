//! Output formatting utilities for CLI.

use handswarm::SessionSummary;
use serde::Serialize;
use std::fmt::Write as _;

/// Format one session summary as human-readable text.
pub(super) fn format_summary_text(summary: &SessionSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Session Result (seed: {})", summary.seed);
    let _ = writeln!(output, "  Frames: {}", summary.frames);
    let _ = writeln!(output, "  Score: {}", summary.score);
    let _ = writeln!(output, "  Wave: {}", summary.wave);
    let _ = writeln!(output, "  Combo: {}", summary.combo);
    let _ = writeln!(
        output,
        "  Monsters: {} defeated, {} left",
        summary.defeated, summary.monsters_left
    );
    let _ = writeln!(
        output,
        "  Gestures: {} gather / {} scatter / {} free",
        summary.gather_frames, summary.scatter_frames, summary.free_frames
    );
    if summary.invariant_violations > 0 {
        let _ = writeln!(
            output,
            "  Invariant violations: {}",
            summary.invariant_violations
        );
    }

    output
}

/// Aggregated statistics over many sessions.
#[derive(Debug, Default)]
pub(super) struct SoakStats {
    /// Sessions finished.
    pub(super) sessions: u64,
    /// Frames simulated across all sessions.
    pub(super) total_frames: u64,
    /// Score sum.
    total_score: u64,
    /// Score sum of squares for std dev calculation.
    score_sq_sum: f64,
    /// Wave sum.
    total_waves: u64,
    /// Best single-session result as (score, seed).
    best: Option<(u64, u64)>,
    /// Highest wave reached.
    max_wave: u32,
    /// Invariant violations across all sessions.
    pub(super) invariant_violations: u64,
    /// Seeds of sessions that violated an invariant.
    failing_seeds: Vec<u64>,
    /// Per-session rows.
    rows: Vec<SessionSummary>,
}

impl SoakStats {
    /// Add one session result.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn add_summary(&mut self, summary: &SessionSummary) {
        self.sessions += 1;
        self.total_frames += summary.frames;
        self.total_score += summary.score;
        self.score_sq_sum += summary.score as f64 * summary.score as f64;
        self.total_waves += u64::from(summary.wave);
        self.max_wave = self.max_wave.max(summary.wave);
        if self.best.is_none_or(|(score, _)| summary.score > score) {
            self.best = Some((summary.score, summary.seed));
        }
        if summary.invariant_violations > 0 {
            self.invariant_violations += summary.invariant_violations;
            self.failing_seeds.push(summary.seed);
        }
        self.rows.push(*summary);
    }

    /// Merge stats from another thread.
    pub(super) fn merge(&mut self, other: Self) {
        self.sessions += other.sessions;
        self.total_frames += other.total_frames;
        self.total_score += other.total_score;
        self.score_sq_sum += other.score_sq_sum;
        self.total_waves += other.total_waves;
        self.max_wave = self.max_wave.max(other.max_wave);
        if let Some((score, seed)) = other.best
            && self.best.is_none_or(|(best, _)| score > best)
        {
            self.best = Some((score, seed));
        }
        self.invariant_violations += other.invariant_violations;
        self.failing_seeds.extend(other.failing_seeds);
        self.rows.extend(other.rows);
    }

    /// Sort per-session output by seed.
    pub(super) fn finish(&mut self) {
        self.failing_seeds.sort_unstable();
        self.rows.sort_by_key(|row| row.seed);
    }

    /// Get average score.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_score(&self) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.sessions as f64
    }

    /// Get score standard deviation.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn score_std_dev(&self) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        let n = self.sessions as f64;
        let mean = self.avg_score();
        let variance = (self.score_sq_sum / n) - (mean * mean);
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Get average final wave.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_wave(&self) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        self.total_waves as f64 / self.sessions as f64
    }
}

/// JSON-serializable soak result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSoakResult<'a> {
    sessions: u64,
    total_frames: u64,
    avg_score: f64,
    score_std_dev: f64,
    best_score: u64,
    best_seed: Option<u64>,
    avg_wave: f64,
    max_wave: u32,
    invariant_violations: u64,
    failing_seeds: &'a [u64],
}

impl<'a> JsonSoakResult<'a> {
    /// Create from stats.
    pub(super) fn from_stats(stats: &'a SoakStats) -> Self {
        Self {
            sessions: stats.sessions,
            total_frames: stats.total_frames,
            avg_score: stats.avg_score(),
            score_std_dev: stats.score_std_dev(),
            best_score: stats.best.map_or(0, |(score, _)| score),
            best_seed: stats.best.map(|(_, seed)| seed),
            avg_wave: stats.avg_wave(),
            max_wave: stats.max_wave,
            invariant_violations: stats.invariant_violations,
            failing_seeds: &stats.failing_seeds,
        }
    }
}

/// Format soak stats as human-readable text.
pub(super) fn format_soak_text(stats: &SoakStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Soak Results ({} sessions)", stats.sessions);
    output.push_str("========================================\n\n");
    let _ = writeln!(output, "Frames simulated: {}", stats.total_frames);
    let _ = writeln!(
        output,
        "Average score: {:.1} (+/- {:.1})",
        stats.avg_score(),
        stats.score_std_dev()
    );
    if let Some((score, seed)) = stats.best {
        let _ = writeln!(output, "Best score: {score} (seed {seed})");
    }
    let _ = writeln!(
        output,
        "Average wave: {:.2} (max {})",
        stats.avg_wave(),
        stats.max_wave
    );

    if stats.failing_seeds.is_empty() {
        output.push_str("\nInvariants: all held\n");
    } else {
        let _ = writeln!(
            output,
            "\nInvariants: {} violations in {} sessions",
            stats.invariant_violations,
            stats.failing_seeds.len()
        );
        let seeds: Vec<String> = stats.failing_seeds.iter().map(u64::to_string).collect();
        let _ = writeln!(output, "  Failing seeds: {}", seeds.join(", "));
    }

    output
}

/// Format soak stats as CSV, one row per session.
pub(super) fn format_soak_csv(stats: &SoakStats) -> String {
    let mut output = String::new();

    output.push_str("seed,frames,score,wave,combo,defeated,monsters_left,invariant_violations\n");

    for row in &stats.rows {
        let _ = writeln!(
            output,
            "{},{},{},{},{},{},{},{}",
            row.seed,
            row.frames,
            row.score,
            row.wave,
            row.combo,
            row.defeated,
            row.monsters_left,
            row.invariant_violations
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(seed: u64, score: u64, wave: u32) -> SessionSummary {
        SessionSummary {
            seed,
            frames: 100,
            score,
            wave,
            defeated: score / 100,
            ..SessionSummary::default()
        }
    }

    #[test]
    fn test_merge_matches_sequential() {
        let mut a = SoakStats::default();
        a.add_summary(&summary(1, 300, 2));
        let mut b = SoakStats::default();
        b.add_summary(&summary(2, 900, 3));
        a.merge(b);
        a.finish();

        assert_eq!(a.sessions, 2);
        assert_eq!(a.best, Some((900, 2)));
        assert_eq!(a.max_wave, 3);
        assert!((a.avg_score() - 600.0).abs() < 1e-9);
        assert!((a.score_std_dev() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_violations_tracked() {
        let mut stats = SoakStats::default();
        stats.add_summary(&SessionSummary {
            invariant_violations: 2,
            ..summary(7, 0, 1)
        });
        assert_eq!(stats.invariant_violations, 2);
        assert!(format_soak_text(&stats).contains("Failing seeds: 7"));
    }

    #[test]
    fn test_csv_rows_sorted_by_seed() {
        let mut stats = SoakStats::default();
        stats.add_summary(&summary(9, 100, 1));
        stats.add_summary(&summary(3, 200, 2));
        stats.finish();

        let csv = format_soak_csv(&stats);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("3,"));
        assert!(lines[2].starts_with("9,"));
    }

    #[test]
    fn test_summary_text() {
        let text = format_summary_text(&summary(5, 400, 2));
        assert!(text.contains("seed: 5"));
        assert!(text.contains("Score: 400"));
        assert!(!text.contains("Invariant"));
    }
}
