//! Source loading and include expansion.
//!
//! The loader reads the primary file, lexes it, and splices the token stream
//! of every `#include`d file in place of its directive. All files share one
//! scratch pool and one [`SourceMap`], so tokens from any file can be mixed
//! freely. Problems with includes are diagnostics; only an unreadable primary
//! file is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ssl_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use ssl_ir::{FileId, PoolId, SourceMap, SourcePos, StringPool, Token, TokenKind};
use tracing::{debug, trace};

use crate::error::lex_error_to_diagnostic;

/// Default limit on `#include` nesting.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 16;

/// The spliced token stream of a unit and everything needed to read it.
#[derive(Debug)]
pub struct LoadedSource {
    /// Tokens of the primary file with includes expanded, ending in `Eof`.
    pub tokens: Vec<Token>,
    /// Every file that contributed tokens; the primary file is
    /// [`FileId::PRIMARY`].
    pub sources: SourceMap,
    /// Text behind token payloads.
    pub scratch: StringPool,
    pub diagnostics: DiagnosticQueue,
}

/// Reads and expands one compilation unit.
pub struct SourceLoader {
    include_dir: Option<PathBuf>,
    max_depth: usize,
    sources: SourceMap,
    scratch: StringPool,
    diagnostics: DiagnosticQueue,
    /// Files currently being expanded, outermost first.
    open: Vec<PathBuf>,
}

impl SourceLoader {
    pub fn new(include_dir: Option<&Path>, max_depth: usize) -> Self {
        SourceLoader {
            include_dir: include_dir.map(Path::to_path_buf),
            max_depth,
            sources: SourceMap::new(),
            scratch: StringPool::new(PoolId::Scratch),
            diagnostics: DiagnosticQueue::new(),
            open: Vec::new(),
        }
    }

    /// Load `path`, reporting positions in it as `display_path`.
    ///
    /// The preprocessor hands over a temporary file; `display_path` is the
    /// script the user wrote, and relative includes are searched next to it.
    pub fn load_file(self, path: &Path, display_path: &Path) -> io::Result<LoadedSource> {
        debug!(path = %path.display(), display = %display_path.display(), "loading primary file");
        let text = fs::read_to_string(path)?;
        Ok(self.load(&text, display_path, canonical(path)))
    }

    /// Load in-memory source text as if it were the file `display_path`.
    pub fn load_str(self, text: &str, display_path: &Path) -> LoadedSource {
        self.load(text, display_path, canonical(display_path))
    }

    fn load(mut self, text: &str, display_path: &Path, key: PathBuf) -> LoadedSource {
        let file = self.sources.add(display_path);
        debug_assert_eq!(file, FileId::PRIMARY);

        let mut tokens = Vec::new();
        self.open.push(key);
        let eof = self.expand(text, file, display_path.parent(), &mut tokens);
        self.open.pop();
        tokens.push(Token::new(TokenKind::Eof, eof));

        debug!(
            tokens = tokens.len(),
            files = self.sources.len(),
            "source loaded"
        );
        LoadedSource {
            tokens,
            sources: self.sources,
            scratch: self.scratch,
            diagnostics: self.diagnostics,
        }
    }

    /// Lex `text` into `out`, expanding includes. Returns the position of the
    /// file's end, whose `Eof` token is not emitted.
    fn expand(
        &mut self,
        text: &str,
        file: FileId,
        dir: Option<&Path>,
        out: &mut Vec<Token>,
    ) -> SourcePos {
        let lexed = ssl_lexer::lex(text, file, &mut self.sources, &mut self.scratch);
        for err in &lexed.errors {
            self.diagnostics.push(lex_error_to_diagnostic(err));
        }

        let mut eof = SourcePos::new(file, 1, 1);
        for token in lexed.tokens {
            match token.kind {
                TokenKind::Include(name) => {
                    let name = self.scratch.lookup(name).to_string();
                    self.include(&name, token.pos, dir, out);
                }
                TokenKind::Eof => eof = token.pos,
                _ => out.push(token),
            }
        }
        eof
    }

    fn include(&mut self, name: &str, at: SourcePos, dir: Option<&Path>, out: &mut Vec<Token>) {
        if self.open.len() > self.max_depth {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E5003)
                    .with_message(format!(
                        "`#include \"{name}\"` exceeds the include depth limit of {}",
                        self.max_depth
                    ))
                    .with_label(at, "include skipped"),
            );
            return;
        }

        let candidates = self.candidates(name, dir);
        let Some(path) = candidates.iter().find(|p| p.is_file()).cloned() else {
            let mut diag = Diagnostic::error(ErrorCode::E5001)
                .with_message(format!("cannot find include file `{name}`"))
                .with_label(at, "include skipped");
            for candidate in &candidates {
                diag = diag.with_note(format!("searched {}", candidate.display()));
            }
            self.diagnostics.push(diag);
            return;
        };

        let key = canonical(&path);
        if self.open.contains(&key) {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E5002)
                    .with_message(format!("`{name}` includes itself"))
                    .with_label(at, "include cycle"),
            );
            return;
        }

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                self.diagnostics.push(
                    Diagnostic::error(ErrorCode::E5001)
                        .with_message(format!("cannot read include file `{}`", path.display()))
                        .with_label(at, "include skipped")
                        .with_note(err.to_string()),
                );
                return;
            }
        };

        trace!(path = %path.display(), depth = self.open.len(), "expanding include");
        let file = self.sources.add(path.clone());
        self.open.push(key);
        self.expand(&text, file, path.parent(), out);
        self.open.pop();
    }

    /// Search order: the include directory, then the including file's directory.
    fn candidates(&self, name: &str, dir: Option<&Path>) -> Vec<PathBuf> {
        let name = Path::new(name);
        if name.is_absolute() {
            return vec![name.to_path_buf()];
        }
        self.include_dir
            .as_deref()
            .into_iter()
            .chain(dir)
            .map(|base| base.join(name))
            .collect()
    }
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests;
