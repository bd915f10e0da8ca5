//! Drives the plugin hooks the way a bundler would, against fixture output.

use screeps_deploy::api::{BranchInfo, ScreepsApi};
use screeps_deploy::branch::Vcs;
use screeps_deploy::collector::{CodeBundle, Module, get_file_list};
use screeps_deploy::output::{OutputBundle, OutputOptions};
use screeps_deploy::upload::{DeployAction, deploy, prepare};
use screeps_deploy::{Environment, ScreepsConfig, ScreepsOptions, ScreepsPlugin, load_config_file};
use std::path::{Path, PathBuf};

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

struct FixedBranch(&'static str);

impl Vcs for FixedBranch {
    fn current_branch(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}

/// Copy the fixture build output into `<tmp>/dist`.
fn stage_output(tmp: &Path, with_wasm: bool) -> PathBuf {
    let dist = tmp.join("dist");
    std::fs::create_dir_all(&dist).unwrap();
    for name in ["main.js", "main.js.map"] {
        std::fs::copy(Path::new(FIXTURES).join(name), dist.join(name)).unwrap();
    }
    if with_wasm {
        std::fs::copy(
            Path::new(FIXTURES).join("wasm_module.wasm"),
            dist.join("wasm_module.wasm"),
        )
        .unwrap();
    }
    dist
}

fn output() -> OutputOptions {
    OutputOptions {
        file: "dist/main.js".into(),
        sourcemap: true,
    }
}

async fn build(plugin: &ScreepsPlugin, env: &Environment) -> Option<DeployAction> {
    let output = output();
    let bundle = OutputBundle::load(&output, env).await.unwrap();
    let bundle = plugin.generate_bundle(&output, &bundle);
    bundle.emit_maps(&output, env).await.unwrap();
    plugin.write_bundle(&output, &bundle, env).await.unwrap()
}

#[derive(Default)]
struct FakeServer {
    branches: Vec<String>,
    uploads: Vec<(String, CodeBundle)>,
}

impl ScreepsApi for FakeServer {
    async fn authenticate(&mut self, _email: &str, _password: &str) -> screeps_deploy::Result<()> {
        Ok(())
    }

    async fn branches(&mut self) -> screeps_deploy::Result<Vec<BranchInfo>> {
        Ok(self
            .branches
            .iter()
            .map(|b| BranchInfo {
                branch: b.clone(),
                active_world: false,
                active_sim: false,
            })
            .collect())
    }

    async fn set_code(&mut self, branch: &str, code: &CodeBundle) -> screeps_deploy::Result<()> {
        self.uploads.push((branch.to_string(), code.clone()));
        Ok(())
    }

    async fn clone_branch(
        &mut self,
        _source: &str,
        new_name: &str,
        code: &CodeBundle,
    ) -> screeps_deploy::Result<()> {
        self.branches.push(new_name.to_string());
        self.uploads.push((new_name.to_string(), code.clone()));
        Ok(())
    }
}

#[tokio::test]
async fn dry_run_renames_map_without_uploading() {
    let tmp = tempfile::tempdir().unwrap();
    let dist = stage_output(tmp.path(), false);
    let env = Environment::new(tmp.path(), FixedBranch("main"));

    // Unreachable server: any upload attempt would fail the build.
    let config = ScreepsConfig::from_value(serde_json::json!({
        "token": "t",
        "protocol": "http",
        "hostname": "127.0.0.1",
        "port": 1,
        "path": "/",
        "branch": "auto"
    }))
    .unwrap();
    let plugin = ScreepsPlugin::new(ScreepsOptions {
        config: Some(config),
        dry_run: true,
        ..Default::default()
    });

    assert_eq!(build(&plugin, &env).await, None);
    assert!(!dist.join("main.js.map").exists());

    let rendered = std::fs::read_to_string(dist.join("main.js.map.js")).unwrap();
    assert!(rendered.starts_with("module.exports"));
    assert!(!rendered.contains("sourcesContent"));
}

#[tokio::test]
async fn collected_bundle_after_build() {
    let tmp = tempfile::tempdir().unwrap();
    let dist = stage_output(tmp.path(), true);
    let env = Environment::new(tmp.path(), FixedBranch("main"));
    let plugin = ScreepsPlugin::new(ScreepsOptions {
        dry_run: true,
        ..Default::default()
    });
    build(&plugin, &env).await;

    let code = get_file_list(&dist.join("main.js"), &env).await.unwrap();
    assert_eq!(code.len(), 3);
    assert!(code["main"].as_text().unwrap().contains("input"));
    assert!(code["main.js.map"].as_text().unwrap().starts_with("module.exports"));
    assert_eq!(
        code["wasm_module.wasm"],
        Module::Binary {
            binary: "AGFzbQEAAAA=".to_string()
        }
    );
}

#[tokio::test]
async fn auto_branch_is_cloned_then_updated() {
    let tmp = tempfile::tempdir().unwrap();
    stage_output(tmp.path(), false);
    let env = Environment::new(tmp.path(), FixedBranch("feature"));
    let config = ScreepsConfig::from_value(serde_json::json!({
        "email": "you@domain.tld",
        "password": "foo",
        "protocol": "http",
        "hostname": "localhost",
        "port": 21025,
        "path": "/",
        "branch": "auto"
    }))
    .unwrap();

    let (code, branch) = prepare(&config, &output(), &env).await.unwrap();
    assert_eq!(branch, "feature");

    let mut server = FakeServer {
        branches: vec!["default".to_string()],
        ..Default::default()
    };
    let first = deploy(&mut server, &config, &branch, &code).await.unwrap();
    let second = deploy(&mut server, &config, &branch, &code).await.unwrap();

    assert_eq!(first, DeployAction::Cloned);
    assert_eq!(second, DeployAction::Updated);
    assert_eq!(server.uploads.len(), 2);
    assert_eq!(server.uploads[0].1, server.uploads[1].1);
}

#[test]
fn fixture_config_loads_branch() {
    let config = load_config_file(&Path::new(FIXTURES).join("screeps.json")).unwrap();
    assert_eq!(config.branch, "foo");
    // Credentials are not accepted by the public server.
    assert!(!screeps_deploy::validate_config(&config));
}
