use crate::command::{
    GroovyCommand, GroovyScanner, COMMAND_LAYER, GROOVY_FILES_DELIM, GROOVY_FILES_VAR,
};
use crate::fingerprint::FingerprintEngine;
use crate::CoreError;
use bootslice_layers::{
    AnySlicer, BuildPlan, LaunchMetadata, LayerContribution, LayerWriter, LayersIndex,
    LayersLayout, Process, Slicer, Slices,
};
use bootslice_schema::{JarDependency, Metadata};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the layer that carries the launch classpath, and of the build plan entry.
pub const SPRING_BOOT_LAYER: &str = "spring-boot";

const CLASSPATH_VAR: &str = "CLASSPATH";
const CLASSPATH_DELIM: &str = ":";
const PROCESS_TYPES: [&str; 3] = ["spring-boot", "task", "web"];

/// Orchestrates detection, slicing, fingerprinting, and layer output for one
/// unpacked application.
pub struct Engine {
    application_root: PathBuf,
    fingerprints: FingerprintEngine,
    groovy: GroovyScanner,
}

/// What the Spring Boot part of a build computed and wrote.
#[derive(Debug, Clone)]
pub struct SpringBootBuild {
    pub metadata: Metadata,
    pub slices: Slices,
    pub dependencies: Vec<JarDependency>,
    pub plan: BuildPlan,
}

/// Everything a build contributed. At least one part is present.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub spring_boot: Option<SpringBootBuild>,
    pub command: Option<GroovyCommand>,
}

impl Engine {
    pub fn new(application_root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        Ok(Self {
            application_root: application_root.into(),
            fingerprints: FingerprintEngine::new()?,
            groovy: GroovyScanner::new()?,
        })
    }

    pub fn application_root(&self) -> &Path {
        &self.application_root
    }

    /// Application metadata, or `None` when the tree is not a Spring Boot
    /// application.
    pub fn detect(&self) -> Result<Option<Metadata>, CoreError> {
        let metadata = Metadata::from_application(&self.application_root)?;
        match &metadata {
            Some(m) => debug!("detected Spring Boot {}", m.version),
            None => debug!(
                "{} is not a Spring Boot application",
                self.application_root.display()
            ),
        }
        Ok(metadata)
    }

    /// Like [`Engine::detect`], but a non-Spring Boot tree is an error.
    pub fn metadata(&self) -> Result<Metadata, CoreError> {
        self.detect()?
            .ok_or_else(|| CoreError::NotSpringBoot(self.application_root.clone()))
    }

    pub fn slices(&self, metadata: &Metadata) -> Result<Slices, CoreError> {
        let slicer = AnySlicer::for_metadata(&self.application_root, metadata)?;
        let slices = slicer.slice()?;
        debug!("{} slicer produced {} slices", slicer.kind(), slices.len());
        Ok(slices)
    }

    pub fn dependencies(&self, metadata: &Metadata) -> Result<Vec<JarDependency>, CoreError> {
        let lib_root = self
            .application_root
            .join(metadata.lib.trim_end_matches('/'));
        self.fingerprints.dependencies(&lib_root)
    }

    /// Launch classpath: the manifest classpath followed by the `classes`
    /// directory of every declared layer.
    pub fn launch_class_path(&self, metadata: &Metadata) -> Result<Vec<PathBuf>, CoreError> {
        let index = LayersIndex::new(&self.application_root, metadata.layers_index.as_deref())?;
        let mut class_path = metadata.class_path.clone();
        class_path.extend(index.layer_class_paths()?);
        Ok(class_path)
    }

    /// Groovy scripts to run through the Spring Boot CLI, if any.
    pub fn command(&self) -> Result<Option<GroovyCommand>, CoreError> {
        self.groovy.command(&self.application_root)
    }

    /// Contribute the application to `layers_dir`. Returns `None` without
    /// writing anything when the tree is neither a Spring Boot application
    /// nor a set of Groovy scripts.
    ///
    /// When both apply, the Spring Boot CLI processes replace the `java`
    /// processes and the slices are kept.
    pub fn build(&self, layers_dir: &Path) -> Result<Option<BuildResult>, CoreError> {
        let metadata = self.detect()?;
        let command = self.command()?;
        if metadata.is_none() && command.is_none() {
            info!("nothing to build for {}", self.application_root.display());
            return Ok(None);
        }

        let writer = LayerWriter::new(LayersLayout::new(layers_dir));
        writer.layout().initialize()?;

        let mut launch = LaunchMetadata::default();
        let spring_boot = match metadata {
            Some(metadata) => Some(self.contribute_spring_boot(&writer, metadata, &mut launch)?),
            None => None,
        };
        if let Some(command) = &command {
            contribute_command(&writer, command, &mut launch)?;
        }

        let launch_file = writer.write_launch(&launch)?;
        debug!("wrote {}", launch_file.display());

        Ok(Some(BuildResult {
            spring_boot,
            command,
        }))
    }

    fn contribute_spring_boot(
        &self,
        writer: &LayerWriter,
        metadata: Metadata,
        launch: &mut LaunchMetadata,
    ) -> Result<SpringBootBuild, CoreError> {
        info!(
            "building Spring Boot {} application {}",
            metadata.version, metadata.start_class
        );

        let slices = self.slices(&metadata)?;
        let dependencies = self.dependencies(&metadata)?;

        let contribution = LayerContribution::new(&metadata)?.with_flags(true, true, true);
        if !writer.write_layer(SPRING_BOOT_LAYER, &contribution)? {
            debug!("{SPRING_BOOT_LAYER} layer metadata unchanged");
        }

        let class_path = self
            .launch_class_path(&metadata)?
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(CLASSPATH_DELIM);
        writer.write_env_append(
            SPRING_BOOT_LAYER,
            CLASSPATH_VAR,
            &class_path,
            CLASSPATH_DELIM,
        )?;

        let command = format!("java -cp ${CLASSPATH_VAR} $JAVA_OPTS {}", metadata.start_class);
        launch.processes = PROCESS_TYPES
            .iter()
            .map(|kind| Process::new(kind, &command))
            .collect();
        launch.slices.clone_from(&slices);

        let plan = BuildPlan::new(SPRING_BOOT_LAYER, &metadata, dependencies.clone())?;
        let plan_file = writer.write_plan(&plan)?;
        debug!("wrote {}", plan_file.display());

        info!(
            "contributed {} slices and {} dependencies",
            slices.len(),
            dependencies.len()
        );
        Ok(SpringBootBuild {
            metadata,
            slices,
            dependencies,
            plan,
        })
    }
}

fn contribute_command(
    writer: &LayerWriter,
    command: &GroovyCommand,
    launch: &mut LaunchMetadata,
) -> Result<(), CoreError> {
    info!(
        "contributing Spring Boot CLI command for {} scripts",
        command.files.len()
    );
    let contribution = LayerContribution::new(command)?.with_flags(true, false, false);
    if !writer.write_layer(COMMAND_LAYER, &contribution)? {
        debug!("{COMMAND_LAYER} layer metadata unchanged");
    }
    writer.write_launch_env_append(
        COMMAND_LAYER,
        GROOVY_FILES_VAR,
        &command.groovy_files_value(),
        GROOVY_FILES_DELIM,
    )?;
    launch.processes = command.processes();
    Ok(())
}
