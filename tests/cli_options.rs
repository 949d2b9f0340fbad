// tests/cli_options.rs

use clap::Parser;

use dagmanifest::cli::CliArgs;
use dagmanifest::config::{ConvertSection, GroupSpec};
use dagmanifest::resolve_options;
use dagmanifest::types::Seconds;

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["dagmanifest", "--workflow", "wf.toml"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("valid arguments")
}

#[test]
fn defaults_come_from_the_convert_section() {
    let section = ConvertSection {
        groups: vec!["adcirc:256".to_string()],
        max_cores: Some(64),
        ..ConvertSection::default()
    };

    let options = resolve_options(&section, &args(&[])).unwrap();
    assert_eq!(options.groups, vec![GroupSpec::capped("adcirc", 256)]);
    assert_eq!(options.default_max_cores, Some(64));
    assert!(options.sequence_fusion);
    assert_eq!(options.runtime_buffer, Seconds::Whole(60));
}

#[test]
fn cli_flags_override_and_extend_the_file() {
    let section = ConvertSection {
        groups: vec!["adcirc".to_string()],
        ..ConvertSection::default()
    };

    let options = resolve_options(
        &section,
        &args(&[
            "--group",
            "ww3:128",
            "--group",
            "SWAN Inner North",
            "--max-cores",
            "512",
            "--no-sequence-fusion",
            "--runtime-buffer",
            "0",
        ]),
    )
    .unwrap();

    assert_eq!(
        options.groups,
        vec![
            GroupSpec::new("adcirc"),
            GroupSpec::capped("ww3", 128),
            GroupSpec::new("SWAN Inner North"),
        ]
    );
    assert_eq!(options.default_max_cores, Some(512));
    assert!(!options.sequence_fusion);
    assert_eq!(options.runtime_buffer, Seconds::Whole(0));
}

#[test]
fn malformed_group_flag_is_rejected() {
    let result = resolve_options(&ConvertSection::default(), &args(&["--group", "ww3:many"]));
    assert!(result.is_err());
}
