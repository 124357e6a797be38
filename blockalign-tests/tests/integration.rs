use anyhow::Result;
use util::{output_path, read_toml, run_in_repo_root};

mod util;

#[test]
fn test_build() -> Result<()> {
    run_in_repo_root("build -i test_files/globins.toml")
}

#[test]
fn test_build_all_justifications() -> Result<()> {
    for justification in ["left", "right", "center", "split"] {
        run_in_repo_root(&format!(
            "build -i test_files/globins.toml -j {justification} -c variety --ansi"
        ))?;
    }
    Ok(())
}

#[test]
fn test_build_output() -> Result<()> {
    let output = output_path("build.toml");
    run_in_repo_root(&format!("build -i test_files/globins.toml -o {output}"))?;

    let table = read_toml(&output)?;
    let blocks = table["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 7);
    let aligned = blocks
        .iter()
        .filter(|block| block["aligned"].as_bool().unwrap())
        .count();
    assert_eq!(aligned, 3);

    let rows = table["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1]["score"].as_float(), Some(12.5));
    assert_eq!(rows[1]["status"].as_str(), Some("threaded"));
    Ok(())
}

#[test]
fn test_build_with_edits() -> Result<()> {
    let output = output_path("edits.toml");
    run_in_repo_root(&format!(
        "build -i test_files/globins.toml -e test_files/edits.toml -o {output}"
    ))?;

    let table = read_toml(&output)?;
    let blocks = table["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 7);
    // the first aligned block grew by one column
    assert_eq!(blocks[1]["width"].as_integer(), Some(5));
    let marked = blocks
        .iter()
        .filter(|block| block["marked"].as_bool().unwrap())
        .count();
    assert_eq!(marked, 1);
    Ok(())
}

#[test]
fn test_build_strict_rejects_edit() -> Result<()> {
    run_in_repo_root("build -i test_files/globins.toml -e test_files/rejected_edit.toml")?;
    assert!(
        run_in_repo_root(
            "build -i test_files/globins.toml -e test_files/rejected_edit.toml --strict"
        )
        .is_err()
    );
    Ok(())
}

#[test]
fn test_build_with_pssm() -> Result<()> {
    let output = output_path("pssm.toml");
    run_in_repo_root(&format!(
        "build -i test_files/globins.toml -p test_files/master.pssm -c fit -o {output}"
    ))?;

    let table = read_toml(&output)?;
    let rows = table["rows"].as_array().unwrap();
    // every aligned residue of the master scores five
    assert_eq!(rows[0]["pssm_score"].as_integer(), Some(5 * 14));
    Ok(())
}

#[test]
fn test_build_with_blosum_fit() -> Result<()> {
    run_in_repo_root("build -i test_files/globins.toml -c block-z-fit")
}

#[test]
fn test_extract() -> Result<()> {
    let output = output_path("extract.toml");
    run_in_repo_root(&format!(
        "extract -i test_files/globins.toml -r 1,2 -m 7 --options test_files/options.toml -o {output}"
    ))?;

    let table = read_toml(&output)?;
    let remaining = table["remaining"]["rows"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);

    let pairwise = table["pairwise"].as_array().unwrap();
    assert_eq!(pairwise.len(), 2);
    assert_eq!(pairwise[1]["identifier"].as_str(), Some("insertions"));
    let aligned = pairwise[1]["alignment"]["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|block| block["aligned"].as_bool().unwrap())
        .count();
    // the marked block is left out
    assert_eq!(aligned, 2);

    let footprint = &pairwise[1]["footprint"];
    assert_eq!(footprint["master"]["offset"].as_integer(), Some(0));
    assert_eq!(footprint["master"]["limit"].as_integer(), Some(19));
    assert_eq!(footprint["dependent"]["offset"].as_integer(), Some(0));
    assert_eq!(footprint["dependent"]["limit"].as_integer(), Some(18));
    Ok(())
}

#[test]
fn test_extract_rejections() {
    assert!(run_in_repo_root("extract -i test_files/globins.toml -r 0").is_err());
    assert!(run_in_repo_root("extract -i test_files/globins.toml -r 1 -m 0").is_err());
}

#[test]
fn test_missing_input() {
    assert!(run_in_repo_root("build -i test_files/does_not_exist.toml").is_err());
}
