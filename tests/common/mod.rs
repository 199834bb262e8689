//! Shared helpers for pipeline integration tests.

#![allow(dead_code)]

use kodegen_bundler_installer::bundler::{
    CommandRunner, CompilerSettings, PackageSettings, Platform, ProcessCommand, ProcessOutput,
    Result, Settings, SettingsBuilder,
};
use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Files the fake compiler writes into `main.dist/`, besides the executable.
pub const TREE_FILES: &[(&str, &[u8])] = &[
    ("python3.dll", b"dll"),
    ("lib/certifi/cacert.pem", b"-----BEGIN CERTIFICATE-----"),
    ("data/words.txt", b"alpha\nbeta\n"),
];

/// `CommandRunner` that records every command and simulates the external
/// tools by writing the files they would produce.
pub struct FakeRunner {
    platform: Platform,
    fail_program: Option<String>,
    calls: Mutex<Vec<ProcessCommand>>,
    /// Whether the relocated `.app` existed in the source folder when
    /// `hdiutil` ran.
    bundle_in_tree_at_imaging: Mutex<Option<bool>>,
}

impl FakeRunner {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            fail_program: None,
            calls: Mutex::new(Vec::new()),
            bundle_in_tree_at_imaging: Mutex::new(None),
        }
    }

    /// Makes every invocation of `program` exit with status 1.
    pub fn failing(mut self, program: &str) -> Self {
        self.fail_program = Some(program.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ProcessCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.program().to_string())
            .collect()
    }

    pub fn bundle_in_tree_at_imaging(&self) -> Option<bool> {
        *self.bundle_in_tree_at_imaging.lock().unwrap()
    }

    fn simulate(&self, command: &ProcessCommand) {
        let args = command.get_args();
        match command.program() {
            "makensis" => {
                let output = args
                    .iter()
                    .find_map(|a| a.strip_prefix("-DOUTPUT_FILE="))
                    .expect("makensis called without OUTPUT_FILE");
                let script = Path::new(args.last().unwrap());
                assert!(script.is_file(), "NSI script missing: {}", script.display());
                std::fs::write(output, b"installer").unwrap();
            }
            "hdiutil" => {
                let source = args
                    .iter()
                    .position(|a| a == "-srcfolder")
                    .map(|i| PathBuf::from(&args[i + 1]))
                    .expect("hdiutil called without -srcfolder");
                let has_bundle = std::fs::read_dir(&source)
                    .unwrap()
                    .filter_map(|e| e.ok())
                    .any(|e| e.path().extension().is_some_and(|ext| ext == "app"));
                *self.bundle_in_tree_at_imaging.lock().unwrap() = Some(has_bundle);
                std::fs::write(args.last().unwrap(), b"dmg").unwrap();
            }
            _ if args.iter().any(|a| a == "nuitka") => self.simulate_compiler(args),
            other => panic!("unexpected program {}", other),
        }
    }

    fn simulate_compiler(&self, args: &[String]) {
        let output_dir = args
            .iter()
            .find_map(|a| a.strip_prefix("--output-dir="))
            .map(PathBuf::from)
            .expect("compiler called without --output-dir");
        let stem = Path::new(args.last().unwrap())
            .file_stem()
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let tree = output_dir.join(format!("{}.dist", stem));
        for (relative, contents) in TREE_FILES {
            let path = tree.join(relative);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, contents).unwrap();
        }

        match self.platform {
            Platform::Windows => {
                std::fs::write(tree.join(format!("{}.exe", stem)), b"MZ").unwrap();
            }
            Platform::Darwin => {
                let macos = output_dir.join(format!("{}.app/Contents/MacOS", stem));
                std::fs::create_dir_all(&macos).unwrap();
                std::fs::write(macos.join(&stem), b"\xcf\xfa\xed\xfe").unwrap();
            }
            Platform::Unsupported(_) => {}
        }
    }
}

impl CommandRunner for FakeRunner {
    async fn run(&self, command: &ProcessCommand) -> Result<ProcessOutput> {
        self.calls.lock().unwrap().push(command.clone());

        if self.fail_program.as_deref() == Some(command.program()) {
            return Ok(ProcessOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: format!("{} failed", command.program()),
            });
        }

        self.simulate(command);
        Ok(ProcessOutput {
            code: Some(0),
            ..Default::default()
        })
    }
}

/// `{app_name: "Foo", version: "1.2", main_module: "main.py"}` building into `dist`.
pub fn foo_settings(dist: &Path) -> Settings {
    foo_builder(dist).build().unwrap()
}

pub fn foo_builder(dist: &Path) -> SettingsBuilder {
    SettingsBuilder::new()
        .dist_path(dist)
        .package_settings(PackageSettings {
            app_name: "Foo".into(),
            version: "1.2".into(),
            author: "Jane Doe".into(),
            ..Default::default()
        })
        .compiler_settings(CompilerSettings {
            interpreter: "python3".into(),
            main_module: "main.py".into(),
            ..Default::default()
        })
}

/// Relative `/`-separated paths of every file under `root`, sorted.
pub fn relative_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_str().unwrap().to_string())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}

/// Entry names of a zip archive, sorted.
pub fn archive_entries(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}
