mod common;

use docgraph_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn check_passes_for_a_clean_site() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_site(tmp.path())?;

	common::docgraph_cmd()
		.arg("check")
		.arg("--mode")
		.arg("development")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("all 3 document(s) passed"));

	Ok(())
}

#[test]
fn check_lists_every_failing_document() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::sample_site(tmp.path())?;
	common::write_file(
		tmp.path(),
		"content/textile/docs/presence.textile",
		common::WITHOUT_META_DESCRIPTION,
	)?;
	common::write_file(
		tmp.path(),
		"content/textile/docs/history.textile",
		common::WITHOUT_META_DESCRIPTION,
	)?;

	common::docgraph_cmd()
		.arg("check")
		.arg("--mode")
		.arg("development")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("2 of 5 document(s) failed"))
		.stderr(
			predicates::str::contains("docs/presence.textile")
				.and(predicates::str::contains("docs/history.textile")),
		);

	Ok(())
}

#[test]
fn check_reports_malformed_inline_toc_in_production() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		tmp.path(),
		"content/textile/docs/broken.textile",
		"inline-toc.\n  - [unclosed\n\nh1. Broken\n",
	)?;

	common::docgraph_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("is not valid YAML"));

	Ok(())
}

#[test]
fn check_exempts_version_pages() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		tmp.path(),
		"content/textile/docs/sdks/versions/v1.2/presence.textile",
		common::WITHOUT_META_DESCRIPTION,
	)?;

	common::docgraph_cmd()
		.arg("check")
		.arg("--mode")
		.arg("development")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("all 1 document(s) passed"));

	Ok(())
}

#[test]
fn no_color_flag_keeps_output_plain() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		tmp.path(),
		"content/textile/docs/presence.textile",
		common::WITHOUT_META_DESCRIPTION,
	)?;

	common::docgraph_cmd()
		.env_remove("NO_COLOR")
		.arg("check")
		.arg("--no-color")
		.arg("--mode")
		.arg("development")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(
			predicates::str::contains("Check failed: 1 of 1 document(s) failed.")
				.and(predicates::str::contains("\u{1b}[").not()),
		)
		.stderr(predicates::str::contains("\u{1b}[").not());

	Ok(())
}
