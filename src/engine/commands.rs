//! Catalog, analysis and variable commands.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::analysis::{self, AnalysisError};
use crate::catalog::{SearchOutcome, Song, SortKey, UNKNOWN_KEY};
use crate::dsl::{AnalyzeCmd, Assignment, Expr, SongDecl};
use crate::engine::value::format_float;

use super::{evaluate, Context, Engine, EngineError};

impl<W: Write> Engine<W> {
    /// Add a song to the catalog, detecting its BPM once.
    pub(super) fn declare_song(
        &mut self,
        decl: &SongDecl,
        ctx: &mut Context,
    ) -> Result<(), EngineError> {
        if !self.analyzer.audio_exists(&decl.file) {
            return Err(EngineError::MissingAudioFile {
                song: decl.name.clone(),
                path: decl.file.clone(),
            });
        }
        let bpm = self.analyzer.detect_bpm(&decl.file);
        let key = decl.key.as_deref().unwrap_or(UNKNOWN_KEY);
        let song = Song::new(&decl.name, &decl.artist, &decl.genre, &decl.file, bpm).with_key(key);

        writeln!(
            self.out,
            "Added song: {} by {} ({})",
            song.name, song.artist, song.genre
        )?;
        info!(name = %song.name, bpm, key = %song.key, "song declared");
        ctx.catalog.declare(song);
        Ok(())
    }

    pub(super) fn search(&mut self, name: &str, ctx: &Context) -> Result<(), EngineError> {
        writeln!(self.out)?;
        writeln!(self.out, "Executing search for: {name}")?;
        match ctx.catalog.search(name) {
            SearchOutcome::Found(song) => {
                writeln!(self.out, "Song: {}", song.name)?;
                writeln!(self.out, "  Artist: {}", song.artist)?;
                writeln!(self.out, "  BPM: {}", format_float(song.bpm))?;
                writeln!(self.out, "  Key: {}", song.key)?;
                writeln!(self.out, "  Genre: {}", song.genre)?;
            }
            SearchOutcome::NotFound => self.not_found(name)?,
            SearchOutcome::Scratched => {
                warn!(name, "search for scratched song");
                writeln!(self.out, "Error: Song '{name}' has been scratched.")?;
            }
        }
        Ok(())
    }

    /// Suggest mix points for a song or a bare file.
    pub(super) fn analyze(&mut self, cmd: &AnalyzeCmd, ctx: &Context) -> Result<(), EngineError> {
        let bars = cmd.bars.unwrap_or(self.default_bars);

        let (path, bpm) = match (&cmd.song, &cmd.file) {
            (Some(name), _) => match ctx.catalog.get(name) {
                Some(song) => (song.audio_file.clone(), cmd.bpm.or(Some(song.bpm))),
                None => return self.not_found(name),
            },
            (None, Some(file)) => (file.clone(), cmd.bpm),
            (None, None) => {
                warn!("analyze without song or file");
                writeln!(self.out, "Error analyzing audio: no song or file given")?;
                return Ok(());
            }
        };

        writeln!(self.out, "Analyzing audio: {}", path.display())?;
        match analysis::analyze_mix(self.analyzer.as_ref(), &path, bpm, bars) {
            Ok(report) => {
                writeln!(self.out, "Using BPM: {:.2}", report.bpm)?;
                writeln!(
                    self.out,
                    "Mix points: segment {}, mix-in at {}, mix-out at {}",
                    report.points.segment_index,
                    report.points.mix_in_time,
                    report.points.mix_out_time
                )?;
                debug!(path = %path.display(), bpm = report.bpm, bars, "mix points found");
            }
            Err(e) => self.analysis_failed(&path, &e)?,
        }
        Ok(())
    }

    /// List songs, optionally restricted to one genre, sorted by `identifier`.
    ///
    /// The identifier is validated before anything is written.
    pub(super) fn organize(
        &mut self,
        genre: Option<&str>,
        identifier: &str,
        ctx: &Context,
    ) -> Result<(), EngineError> {
        let key: SortKey = identifier.parse()?;

        let songs = ctx.catalog.songs().iter();
        let sorted = match genre {
            Some(genre) => {
                writeln!(self.out, "{genre} songs organized by {identifier}:")?;
                let genre = genre.to_lowercase();
                key.sort(songs.filter(|s| s.genre.to_lowercase() == genre))
            }
            None => {
                writeln!(self.out, "All songs organized by {identifier}:")?;
                key.sort(songs)
            }
        };
        for song in sorted {
            writeln!(self.out, "{}", key.describe(song))?;
        }
        Ok(())
    }

    pub(super) fn scratch(&mut self, name: &str, ctx: &mut Context) -> Result<(), EngineError> {
        match ctx.catalog.scratch(name) {
            Some(song) => {
                writeln!(
                    self.out,
                    "Song '{}' by {} has been scratched.",
                    song.name, song.artist
                )?;
                info!(name = %song.name, "song scratched");
                Ok(())
            }
            None => self.not_found(name),
        }
    }

    pub(super) fn add_audio(
        &mut self,
        name: &str,
        file: &Path,
        ctx: &mut Context,
    ) -> Result<(), EngineError> {
        match ctx.catalog.set_audio_file(name, file) {
            Some(song) => {
                writeln!(
                    self.out,
                    "Audio file for '{}' set to {}",
                    song.name,
                    file.display()
                )?;
                info!(name = %song.name, file = %file.display(), "audio file replaced");
                Ok(())
            }
            None => self.not_found(name),
        }
    }

    /// Evaluate and bind. Nothing is bound when evaluation fails.
    pub(super) fn assign(
        &mut self,
        assignment: &Assignment,
        ctx: &mut Context,
    ) -> Result<(), EngineError> {
        let value = evaluate(&assignment.expression, &ctx.vars)?;
        debug!(name = %assignment.name, %value, "set");
        ctx.vars.set(assignment.name.as_str(), value);
        Ok(())
    }

    pub(super) fn shout(&mut self, expression: &Expr, ctx: &Context) -> Result<(), EngineError> {
        let value = evaluate(expression, &ctx.vars)?;
        writeln!(self.out, "{value}")?;
        Ok(())
    }

    fn not_found(&mut self, name: &str) -> Result<(), EngineError> {
        warn!(name, "song not found");
        writeln!(self.out, "Error: Song '{name}' not found in the database.")?;
        Ok(())
    }

    fn analysis_failed(&mut self, path: &Path, err: &AnalysisError) -> Result<(), EngineError> {
        warn!(path = %path.display(), error = %err, "analysis failed");
        writeln!(self.out, "Error analyzing audio: {err}")?;
        Ok(())
    }
}
