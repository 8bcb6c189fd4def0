use std::fs;

use pixi_ci_harness::{
    CONDA_FORGE, LocalChannel, PIXI_CONFIG, RATTLER_BUILD_BACKEND, Workspace,
    copytree_with_local_backend, tmp_pixi_workspace,
};

#[test]
fn simple_workspace_writes_all_documents() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp_pixi_workspace(tmp.path()).unwrap();
    assert_eq!(fs::read_to_string(root.join(".pixi/config.toml")).unwrap(), PIXI_CONFIG);

    let workspace = Workspace::simple(&root, "simple-package", "linux-64").unwrap();
    workspace.write_files().unwrap();

    assert!(workspace.workspace_dir.join(".pixi/config.toml").is_file());
    assert!(!root.join(".pixi").exists());

    let manifest: toml::Table = fs::read_to_string(workspace.workspace_dir.join("pixi.toml"))
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(manifest["workspace"]["platforms"][0].as_str(), Some("linux-64"));
    assert_eq!(
        manifest["dependencies"]["simple-package"]["path"].as_str(),
        Some("package")
    );

    let package: toml::Table = fs::read_to_string(workspace.package_dir.join("pixi.toml"))
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(
        package["package"]["build"]["backend"]["name"].as_str(),
        Some(RATTLER_BUILD_BACKEND)
    );
    assert_eq!(
        package["package"]["build"]["configuration"]["debug-dir"].as_str(),
        Some(workspace.debug_dir.display().to_string().as_str())
    );

    let recipe: serde_yaml::Value =
        serde_yaml::from_str(&fs::read_to_string(&workspace.recipe_path).unwrap()).unwrap();
    assert_eq!(recipe["package"]["name"].as_str(), Some("simple-package"));
}

#[test]
fn debug_files_are_found_in_sorted_work_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    let workspace = Workspace::simple(tmp.path(), "pkg", "linux-64").unwrap();
    let work = workspace.workspace_dir.join(".pixi/build/work");
    for dir in ["b", "a", "c"] {
        fs::create_dir_all(work.join(dir).join("debug")).unwrap();
    }
    fs::create_dir_all(work.join("no-debug")).unwrap();
    fs::write(work.join("c/debug/build.sh"), "").unwrap();

    let dirs = workspace.iter_debug_dirs();
    assert_eq!(dirs, vec![work.join("a/debug"), work.join("b/debug"), work.join("c/debug")]);
    assert_eq!(workspace.find_debug_file("build.sh"), Some(work.join("c/debug/build.sh")));
    assert_eq!(workspace.find_debug_file("missing"), None);
}

#[test]
fn copytree_rewrites_nested_manifests() {
    let tmp = tempfile::tempdir().unwrap();
    let channel_dir = tmp.path().join("channel");
    fs::create_dir_all(&channel_dir).unwrap();
    let channel = LocalChannel::from_dir(&channel_dir).unwrap();

    let src = tmp.path().join("src");
    fs::create_dir_all(src.join("pkg/.pixi")).unwrap();
    fs::write(
        src.join("pkg/pixi.toml"),
        "[package]\nname = \"pkg\"\n\n[package.build.backend]\nname = \"pixi-build-python\"\nchannels = [\"https://prefix.dev/pixi-build-backends\"]\n",
    )
    .unwrap();
    fs::write(src.join("pkg/pyproject.toml"), "[project]\nname = \"pkg\"\n").unwrap();
    fs::write(src.join("pkg/stale-1.0-0.conda"), "").unwrap();

    let dst = copytree_with_local_backend(&src, tmp.path().join("dst"), &channel).unwrap();

    let manifest: toml::Table = fs::read_to_string(dst.join("pkg/pixi.toml"))
        .unwrap()
        .parse()
        .unwrap();
    let channels: Vec<&str> = manifest["package"]["build"]["backend"]["channels"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    assert_eq!(channels, vec![channel.as_str()]);
    assert_ne!(channels[0], CONDA_FORGE);
    assert!(dst.join("pkg/pyproject.toml").is_file());
    assert!(!dst.join("pkg/.pixi").exists());
    assert!(!dst.join("pkg/stale-1.0-0.conda").exists());
}
