use crate::CoreError;
use bootslice_layers::Process;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Layer that carries the Groovy script list for the Spring Boot CLI.
pub const COMMAND_LAYER: &str = "command";
pub const GROOVY_FILES_VAR: &str = "GROOVY_FILES";
pub const GROOVY_FILES_DELIM: &str = " ";

const PROCESS_TYPES: [&str; 3] = ["spring-boot-cli", "task", "web"];
const POGO_PATTERN: &str = r"class\s+\w+[\s\w]*\{";
const CONFIGURATION_PATTERN: &str = r"beans\s*\{";
// Logback configuration scripts are not application code.
const LOGBACK_DIR: &str = "ch/qos/logback";

/// Finds the Groovy scripts an application runs through `spring run`.
#[derive(Debug, Clone)]
pub struct GroovyScanner {
    pogo: Regex,
    configuration: Regex,
}

/// Groovy scripts of one application, in walk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroovyCommand {
    pub files: Vec<PathBuf>,
}

impl GroovyScanner {
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self {
            pogo: Regex::new(POGO_PATTERN)?,
            configuration: Regex::new(CONFIGURATION_PATTERN)?,
        })
    }

    /// The command for `root`, or `None` when it holds no runnable scripts.
    pub fn command(&self, root: &Path) -> Result<Option<GroovyCommand>, CoreError> {
        let files = self.groovy_files(root)?;
        if files.is_empty() {
            debug!("no Groovy scripts under {}", root.display());
            return Ok(None);
        }
        debug!("found {} Groovy scripts", files.len());
        Ok(Some(GroovyCommand { files }))
    }

    /// Every regular `*.groovy` file under `root` that declares a class or a
    /// bean configuration. Files that are not valid UTF-8 are kept.
    pub fn groovy_files(&self, root: &Path) -> Result<Vec<PathBuf>, CoreError> {
        if !root.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file()
                || entry.path().extension().and_then(|ext| ext.to_str()) != Some("groovy")
            {
                continue;
            }
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if rel.to_string_lossy().contains(LOGBACK_DIR) {
                debug!("skipping logback script {}", rel.display());
                continue;
            }
            let content = fs::read(entry.path())?;
            if self.is_script(&content) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn is_script(&self, content: &[u8]) -> bool {
        match std::str::from_utf8(content) {
            Ok(text) => self.pogo.is_match(text) || self.configuration.is_match(text),
            Err(_) => true,
        }
    }
}

impl GroovyCommand {
    /// Space-joined script paths, the value appended to `GROOVY_FILES`.
    pub fn groovy_files_value(&self) -> String {
        self.files
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(GROOVY_FILES_DELIM)
    }

    pub fn processes(&self) -> Vec<Process> {
        let command = format!("spring run -cp $CLASSPATH ${GROOVY_FILES_VAR}");
        PROCESS_TYPES
            .iter()
            .map(|kind| Process::new(kind, &command))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scanner() -> GroovyScanner {
        GroovyScanner::new().unwrap()
    }

    #[test]
    fn no_groovy_files_is_no_command() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "App.java", b"class App {}");
        assert!(scanner().command(dir.path()).unwrap().is_none());
    }

    #[test]
    fn groovy_directory_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "test.groovy/test", b"class X {");
        assert!(scanner().command(dir.path()).unwrap().is_none());
    }

    #[test]
    fn plain_text_script_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "test.groovy", b"x");
        assert!(scanner().command(dir.path()).unwrap().is_none());
    }

    #[test]
    fn logback_script_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ch/qos/logback/test.groovy", b"class X {");
        assert!(scanner().command(dir.path()).unwrap().is_none());
    }

    #[test]
    fn class_declaration_is_a_script() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "test.groovy", b"class X {");
        let command = scanner().command(dir.path()).unwrap().unwrap();
        assert_eq!(command.files, vec![dir.path().join("test.groovy")]);
    }

    #[test]
    fn bean_configuration_is_a_script() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "test.groovy", b"beans {");
        assert!(scanner().command(dir.path()).unwrap().is_some());
    }

    #[test]
    fn non_utf8_script_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "test.groovy", &[0xff, 0xfe, 0x00, 0x80]);
        assert!(scanner().command(dir.path()).unwrap().is_some());
    }

    #[test]
    fn absent_root_is_no_command() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scanner().command(&dir.path().join("absent")).unwrap().is_none());
    }

    #[test]
    fn scripts_follow_walk_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "pogo_2.groovy", b"class Two {\n}");
        write(root, "pogo_1.groovy", b"class One extends Base {\n}");
        write(root, "directory/pogo_4.groovy", b"class Four {}");
        write(root, "invalid.groovy", &[0xc3, 0x28]);
        write(root, "notes.groovy", b"println 'hi'");

        let command = scanner().command(root).unwrap().unwrap();
        assert_eq!(
            command.files,
            vec![
                root.join("directory/pogo_4.groovy"),
                root.join("invalid.groovy"),
                root.join("pogo_1.groovy"),
                root.join("pogo_2.groovy"),
            ]
        );
        assert_eq!(
            command.groovy_files_value(),
            format!(
                "{} {} {} {}",
                root.join("directory/pogo_4.groovy").display(),
                root.join("invalid.groovy").display(),
                root.join("pogo_1.groovy").display(),
                root.join("pogo_2.groovy").display(),
            )
        );
    }

    #[test]
    fn processes_run_scripts_through_spring_cli() {
        let command = GroovyCommand {
            files: vec![PathBuf::from("/app/a.groovy")],
        };
        let processes = command.processes();
        let kinds: Vec<_> = processes.iter().map(|p| p.kind.as_str()).collect();
        assert_eq!(kinds, ["spring-boot-cli", "task", "web"]);
        assert!(processes
            .iter()
            .all(|p| p.command == "spring run -cp $CLASSPATH $GROOVY_FILES"));
    }
}
