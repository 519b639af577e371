use promptcheck_core::model::{ActiveVersionMap, Environment};
use promptcheck_core::manifest::load_active_versions;
use promptcheck_core::prompts::resolve;
use std::fs;
use std::path::Path;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "core_instructions: \"Respond briefly.\"\n").unwrap();
}

#[test]
fn pinned_version_resolves_to_version_file() {
    let dir = tempfile::tempdir().unwrap();
    let prompts = dir.path().join("prompts");
    touch(&prompts.join("interpersonal/v3.yaml"));
    touch(&prompts.join("interpersonal/v1.yaml"));

    let manifest = dir.path().join("manifest.yaml");
    fs::write(
        &manifest,
        "defaults:\n  dev:\n    interpersonal: interpersonal-v3\n",
    )
    .unwrap();

    let active = load_active_versions(&manifest, Environment::Dev).unwrap();
    assert_eq!(
        resolve(&prompts, "interpersonal", active.as_ref()),
        prompts.join("interpersonal/v3.yaml")
    );
}

#[test]
fn falls_back_to_exact_identifier_file() {
    let dir = tempfile::tempdir().unwrap();
    let prompts = dir.path().join("prompts");
    touch(&prompts.join("emotion/emotion-v2.yaml"));

    let active = ActiveVersionMap::from([("emotion".to_string(), "emotion-v2".to_string())]);
    assert_eq!(
        resolve(&prompts, "emotion", Some(&active)),
        prompts.join("emotion/emotion-v2.yaml")
    );
}

#[test]
fn every_level_of_absence_falls_through_to_v1_unchecked() {
    let dir = tempfile::tempdir().unwrap();
    let prompts = dir.path().join("prompts");
    let expected = prompts.join("distress/v1.yaml");

    // no manifest
    assert_eq!(resolve(&prompts, "distress", None), expected);

    // manifest without the environment
    let manifest = dir.path().join("manifest.yaml");
    fs::write(&manifest, "defaults:\n  prod:\n    distress: distress-v4\n").unwrap();
    let active = load_active_versions(&manifest, Environment::Dev).unwrap();
    assert!(active.is_none());
    assert_eq!(resolve(&prompts, "distress", active.as_ref()), expected);

    // environment without the domain
    let other = ActiveVersionMap::from([("emotion".to_string(), "emotion-v2".to_string())]);
    assert_eq!(resolve(&prompts, "distress", Some(&other)), expected);

    // pinned files missing on disk
    let pinned = ActiveVersionMap::from([("distress".to_string(), "distress-v9".to_string())]);
    assert_eq!(resolve(&prompts, "distress", Some(&pinned)), expected);

    assert!(!expected.exists());
}
