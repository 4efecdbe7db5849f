//! Ring Viewer
//!
//! Mounts the ring viewer (`/`) and the debug lab (`/debug`) against an asset
//! directory and prints what each scene contains.
//!
//! ```text
//! ring_viewer [ASSET_ROOT] [SETTINGS_JSON]
//! ```
//!
//! `ASSET_ROOT` defaults to `public`, where `/3d_models/Ring_Raw.glb`,
//! `/hdr/brown_photostudio_02_4k_copy.exr` (viewer) and
//! `/hdr/brown_photostudio_02_4k.exr` (debug) are expected.

use anyhow::Context;
use lustre::shell::NAV_ITEMS;
use lustre::{FileAssetLoader, LoadState, MaterialRole, Scene, ViewShell, ViewerSettings};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let root = args.next().unwrap_or_else(|| "public".to_string());
    let settings = match args.next() {
        Some(path) => ViewerSettings::from_file(&path)
            .with_context(|| format!("reading settings from {path}"))?,
        None => ViewerSettings::default(),
    };

    let loader = FileAssetLoader::new(&root);
    let mut shell = ViewShell::new(settings);

    for item in NAV_ITEMS {
        println!("== {} ({}) ==", item.label, item.path);
        if shell.navigate(item.path).is_none() {
            println!("  no view");
            continue;
        }
        shell.drive(&loader);

        match shell.load_state() {
            Some(LoadState::Ready) => {
                if let Some(scene) = shell.scene() {
                    print_summary(scene);
                }
            }
            Some(LoadState::Failed(message)) => println!("  failed: {message}"),
            Some(state) => println!("  {state}"),
            None => println!("  nothing mounted"),
        }
    }

    shell.unmount();
    Ok(())
}

fn print_summary(scene: &Scene) {
    println!(
        "  {:?} scene #{}: camera at {} (fov {}), tone mapping {}",
        scene.kind,
        scene.id,
        scene.camera.position,
        scene.camera.fov,
        scene.render.tone_mapping
    );
    for role in [MaterialRole::Metal, MaterialRole::Gem] {
        for mesh in scene.meshes_with_role(role) {
            let t = mesh.world_matrix().translation;
            println!(
                "  [{role}] {} ({} vertices) at ({:.3}, {:.3}, {:.3})",
                mesh.name,
                mesh.geometry.vertex_count(),
                t.x,
                t.y,
                t.z
            );
        }
    }
    for entity in &scene.pass_through {
        println!("  [as authored] {} ({:?})", entity.name, entity.kind);
    }
    if let Some(bounds) = scene.bounding_box() {
        let size = bounds.size();
        println!("  bounds {:.3} x {:.3} x {:.3}", size.x, size.y, size.z);
    }
    for warning in &scene.report.warnings {
        println!("  warning: {warning}");
    }
    let env = &scene.environment.map;
    println!(
        "  environment {} ({}x{}), background {}",
        env.source(),
        env.width,
        env.height,
        scene.environment.background
    );
}
