//! rgbdsim - RGB-D scene composer
//!
//! Composes scene descriptions into simulator documents, prints camera
//! intrinsics, and back-projects captured depth into point clouds.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

use rgbdsim::config::AppConfig;
use rgbdsim::scene::{resolve_template_path, SceneAssembly};
use rgbdsim_capture::load_depth_png;
use rgbdsim_core::{write_xyz, Camera, SceneDescription};

fn cli() -> Command {
    let description_arg = Arg::new("description")
        .short('d')
        .long("description")
        .value_name("FILE")
        .help("Scene description (RON); defaults to scene.description from config");

    Command::new("rgbdsim")
        .about("Compose RGB-D simulation scenes and turn captured depth into point clouds")
        .subcommand_required(true)
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding default.toml and user.toml")
                .default_value("config")
                .global(true),
        )
        .subcommand(
            Command::new("compose")
                .about("Compose a scene description into a scene document")
                .arg(description_arg.clone())
                .arg(
                    Arg::new("template")
                        .short('t')
                        .long("template")
                        .value_name("FILE")
                        .help("Template document, overriding the description and config"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Where to write the document; defaults to output.directory/output.scene_file"),
                )
                .arg(
                    Arg::new("stdout")
                        .long("stdout")
                        .help("Print the document instead of writing it")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("intrinsics")
                .about("Print each camera's intrinsic matrix")
                .arg(description_arg.clone()),
        )
        .subcommand(
            Command::new("cloud")
                .about("Back-project a 16-bit depth PNG into an .xyz point cloud")
                .arg(description_arg)
                .arg(
                    Arg::new("camera")
                        .short('c')
                        .long("camera")
                        .value_name("NAME")
                        .help("Camera that captured the depth image")
                        .required(true),
                )
                .arg(
                    Arg::new("depth")
                        .long("depth")
                        .value_name("PNG")
                        .help("Depth image; defaults to output.directory/<camera>_depth.png"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Point cloud file; defaults to output.directory/<camera>_depth.xyz"),
                )
                .arg(
                    Arg::new("world")
                        .long("world")
                        .help("Write points in world coordinates instead of the optical frame")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() -> Result<()> {
    let matches = cli().get_matches();

    let config_dir = matches
        .get_one::<String>("config-dir")
        .map(String::as_str)
        .unwrap_or("config");
    let loaded = AppConfig::load_from(config_dir);

    let log_level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    match matches.subcommand() {
        Some(("compose", args)) => compose(&config, args),
        Some(("intrinsics", args)) => intrinsics(&config, args),
        Some(("cloud", args)) => cloud(&config, args),
        _ => anyhow::bail!("no subcommand given"),
    }
}

fn description_path(config: &AppConfig, args: &ArgMatches) -> PathBuf {
    args.get_one::<String>("description")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.scene.description))
}

fn load_description(path: &Path) -> Result<SceneDescription> {
    let description = SceneDescription::load(path)
        .with_context(|| format!("Failed to load scene description {}", path.display()))?;
    log::info!(
        "Loaded scene '{}' with {} objects and {} cameras",
        description.name,
        description.objects.len(),
        description.cameras.len()
    );
    Ok(description)
}

fn load_cameras(config: &AppConfig, args: &ArgMatches) -> Result<Vec<Camera>> {
    let path = description_path(config, args);
    let description = load_description(&path)?;
    description
        .cameras(&config.camera.to_camera_defaults())
        .with_context(|| format!("Invalid camera in {}", path.display()))
}

fn compose(config: &AppConfig, args: &ArgMatches) -> Result<()> {
    let path = description_path(config, args);
    let description = load_description(&path)?;

    let template = resolve_template_path(
        &description,
        &path,
        args.get_one::<String>("template").map(Path::new),
        Path::new(&config.scene.template),
    );

    let scene = SceneAssembly::new(&description)
        .with_camera_defaults(config.camera.to_camera_defaults())
        .with_anchor(config.scene.anchor.clone())
        .with_validation(config.scene.validate)
        .assemble_file(&template)
        .with_context(|| format!("Failed to compose over template {}", template.display()))?;

    if args.get_flag("stdout") {
        println!("{}", scene.document);
        return Ok(());
    }

    let output = args
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(&config.output.directory).join(&config.output.scene_file));
    scene
        .write_document(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Scene written: {}", output.display());
    Ok(())
}

fn intrinsics(config: &AppConfig, args: &ArgMatches) -> Result<()> {
    for camera in load_cameras(config, args)? {
        let (width, height) = camera.resolution();
        let k = camera.camera_matrix();
        println!(
            "Camera: {}, Position: {:?}, FOVY: {}, Resolution: {}x{}",
            camera.name(),
            camera.position().to_array(),
            camera.fovy(),
            width,
            height
        );
        for row in k.rows {
            println!("  [{:>12.4} {:>12.4} {:>12.4}]", row[0], row[1], row[2]);
        }
        println!("  base quat: {:?}", camera.base_quat().to_array());
    }
    Ok(())
}

fn cloud(config: &AppConfig, args: &ArgMatches) -> Result<()> {
    let name = args
        .get_one::<String>("camera")
        .context("--camera is required")?;
    let camera = load_cameras(config, args)?
        .into_iter()
        .find(|c| c.name() == name)
        .with_context(|| format!("Camera '{}' not found in the scene description", name))?;

    let out_dir = Path::new(&config.output.directory);
    let depth_path = args
        .get_one::<String>("depth")
        .map(PathBuf::from)
        .unwrap_or_else(|| out_dir.join(format!("{}_depth.png", name)));
    let output = args
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| out_dir.join(format!("{}_depth.xyz", name)));

    let depth = load_depth_png(&depth_path)
        .with_context(|| format!("Failed to read depth image {}", depth_path.display()))?;
    if (depth.width(), depth.height()) != camera.resolution() {
        log::warn!(
            "Depth image is {}x{} but camera '{}' is {}x{}",
            depth.width(),
            depth.height(),
            name,
            camera.resolution().0,
            camera.resolution().1
        );
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(
        File::create(&output).with_context(|| format!("Failed to create {}", output.display()))?,
    );

    let world = args.get_flag("world") || config.output.world_frame;
    let points = if world {
        write_xyz(camera.back_project(&depth).map(|p| camera.optical_to_world(p)), writer)?
    } else {
        write_xyz(camera.back_project(&depth), writer)?
    };

    println!("Wrote {} points to {}", points, output.display());
    Ok(())
}
