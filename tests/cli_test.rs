use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::process::Command; // Run programs
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

fn round_trip_test(dat: &[u8]) -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let expanded_path = temp_dir.path().join("original.dat");
    let compressed_path = temp_dir.path().join("original.fgk");
    let restored_path = temp_dir.path().join("restored.dat");
    std::fs::write(&expanded_path,dat)?;
    let mut cmd = Command::cargo_bin("huffpress")?;
    cmd.arg("compress")
        .arg("-i").arg(&expanded_path)
        .arg("-o").arg(&compressed_path)
        .assert()
        .success();
    let mut cmd = Command::cargo_bin("huffpress")?;
    cmd.arg("expand")
        .arg("-i").arg(&compressed_path)
        .arg("-o").arg(&restored_path)
        .assert()
        .success();
    match std::fs::read(restored_path) {
        Ok(restored) => {
            assert_eq!(restored,dat);
        },
        _ => panic!("unable to compare output with original")
    }
    Ok(())
}

#[test]
fn text_round_trip() -> STDRESULT {
    let paragraph =
"To be, or not to be, that is the question:
Whether 'tis nobler in the mind to suffer
The slings and arrows of outrageous fortune,
Or to take arms against a sea of troubles.
";
    round_trip_test(paragraph.repeat(40).as_bytes())
}

#[test]
fn binary_round_trip() -> STDRESULT {
    // every byte value, shuffled around by a multiplicative stride
    let dat: Vec<u8> = (0u32..4096).map(|i| (i.wrapping_mul(167) >> 3) as u8).collect();
    round_trip_test(&dat)
}

#[test]
fn empty_round_trip() -> STDRESULT {
    round_trip_test(&[])
}

#[test]
fn missing_input_is_reported() -> STDRESULT {
    let mut cmd = Command::cargo_bin("huffpress")?;
    cmd.arg("compress")
        .arg("-i").arg("no_such_file.dat")
        .arg("-o").arg("unreachable.fgk")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no_such_file.dat"));
    Ok(())
}

#[test]
fn foreign_stream_is_refused() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let bad_path = temp_dir.path().join("foreign.fgk");
    let out_path = temp_dir.path().join("unreachable.dat");
    std::fs::write(&bad_path,b"LZW\0\x01\x00\x00\x00\x00\x00\x00\x00A")?;
    let mut cmd = Command::cargo_bin("huffpress")?;
    cmd.arg("expand")
        .arg("-i").arg(&bad_path)
        .arg("-o").arg(&out_path)
        .assert()
        .failure();
    Ok(())
}

#[test]
fn bad_usage_is_an_error() -> STDRESULT {
    let mut cmd = Command::cargo_bin("huffpress")?;
    cmd.assert().failure();
    Ok(())
}
