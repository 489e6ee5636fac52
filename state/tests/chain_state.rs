use std::fs;

use state::{ChainState, HeadState, RECORD_LEN, STATE_FILE_NAME};
use tempfile::tempdir;

#[test]
fn write_then_fresh_read_round_trips() {
    let dir = tempdir().unwrap();
    let state = HeadState {
        head_block_num: 10,
        head_trust_block_num: 5,
        genesis_time: 123,
    };
    ChainState::at(dir.path()).write(&state).unwrap();

    let reopened = ChainState::at(dir.path());
    assert!(reopened.exists());
    assert_eq!(reopened.read(), state);
    assert_eq!(reopened.path(), dir.path().join(STATE_FILE_NAME));
    assert_eq!(fs::metadata(reopened.path()).unwrap().len(), RECORD_LEN as u64);
}

#[test]
fn write_overwrites_previous_record() {
    let dir = tempdir().unwrap();
    let cs = ChainState::at(dir.path());
    for head in [1u32, 2, 3] {
        cs.write(&HeadState {
            head_block_num: head,
            head_trust_block_num: head - 1,
            genesis_time: 1_700_000_000,
        })
        .unwrap();
    }
    let read = cs.read();
    assert_eq!(read.head_block_num, 3);
    assert_eq!(read.head_trust_block_num, 2);
}

#[test]
fn missing_file_reads_as_default() {
    let dir = tempdir().unwrap();
    let cs = ChainState::at(dir.path());
    assert!(!cs.exists());
    assert_eq!(cs.read(), HeadState::default());
}

#[test]
fn truncated_file_reads_partially() {
    let dir = tempdir().unwrap();
    let cs = ChainState::at(dir.path());
    let full = HeadState {
        head_block_num: 7,
        head_trust_block_num: 6,
        genesis_time: 99,
    }
    .encode();
    fs::write(cs.path(), &full[..8]).unwrap();
    let read = cs.read();
    assert_eq!(read.head_block_num, 7);
    assert_eq!(read.head_trust_block_num, 6);
    assert_eq!(read.genesis_time, 0);
}

#[test]
fn extra_bytes_are_ignored() {
    let dir = tempdir().unwrap();
    let cs = ChainState::at(dir.path());
    let mut raw = HeadState {
        head_block_num: 1,
        head_trust_block_num: 1,
        genesis_time: 1,
    }
    .encode()
    .to_vec();
    raw.extend_from_slice(b"garbage");
    fs::write(cs.path(), raw).unwrap();
    assert_eq!(cs.read().genesis_time, 1);
}

#[test]
fn write_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let cs = ChainState::at(dir.path().join("absent"));
    assert!(cs.write(&HeadState::default()).is_err());
}
