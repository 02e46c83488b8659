use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{Catalog, Translator};
use crate::config::locale_suffix_pattern;
use crate::error::{CatalogError, Result};
use crate::parse::TsParser;
use crate::search::FileSearcher;

/// Every catalog found under a resource directory, keyed by language
#[derive(Debug, Default)]
pub struct LocaleSet {
    catalogs: BTreeMap<String, (PathBuf, Catalog)>,
    skipped: Vec<(PathBuf, String)>,
}

impl LocaleSet {
    /// Walk `dir` for `.ts` files and parse each one. Files that fail to
    /// parse are skipped and listed in [`skipped`](Self::skipped).
    pub fn discover(dir: &Path) -> Result<Self> {
        let files = FileSearcher::for_project(dir).collect(&[dir.to_path_buf()])?;
        if files.is_empty() {
            return Err(CatalogError::no_catalogs(dir));
        }

        let suffix = locale_suffix_pattern()?;
        let mut set = Self::default();
        for file in files {
            match TsParser::parse_file(&file) {
                Ok(catalog) => {
                    let Some(language) = Self::language_of(&catalog, &file, &suffix) else {
                        warn!(file = %file.display(), "cannot tell the language of catalog, skipping");
                        set.skipped
                            .push((file, "no language attribute or suffix".to_string()));
                        continue;
                    };
                    if let Some((previous, _)) = set.catalogs.get(&language) {
                        warn!(
                            language = %language,
                            kept = %previous.display(),
                            ignored = %file.display(),
                            "duplicate catalog for language"
                        );
                        set.skipped.push((file, format!("duplicate language {}", language)));
                        continue;
                    }
                    debug!(language = %language, file = %file.display(), "registered catalog");
                    set.catalogs.insert(language, (file, catalog));
                }
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping unparseable catalog");
                    set.skipped.push((file, e.to_string()));
                }
            }
        }
        Ok(set)
    }

    /// `language` attribute of `<TS>`, else the locale code ending the file stem
    fn language_of(catalog: &Catalog, file: &Path, suffix: &Regex) -> Option<String> {
        if let Some(lang) = catalog.language().filter(|l| !l.is_empty()) {
            return Some(lang.to_string());
        }
        let stem = file.file_stem()?.to_string_lossy();
        if let Some(lang) = suffix.captures(&stem).and_then(|caps| caps.get(1)) {
            return Some(lang.as_str().to_string());
        }
        // app.zh_Hans.ts and other codes the pattern does not know
        stem.rsplit_once('.').map(|(_, lang)| lang.to_string())
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }

    pub fn catalog(&self, language: &str) -> Option<&Catalog> {
        self.catalogs.get(language).map(|(_, c)| c)
    }

    pub fn path(&self, language: &str) -> Option<&Path> {
        self.catalogs.get(language).map(|(p, _)| p.as_path())
    }

    /// Translator for `language`; unknown languages get one that always falls back
    pub fn translator(&self, language: &str) -> Translator {
        match self.catalog(language) {
            Some(catalog) => catalog.translator(),
            None => Translator::empty(Some(language.to_string())),
        }
    }

    pub fn skipped(&self) -> &[(PathBuf, String)] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}
