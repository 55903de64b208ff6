mod common;

use anyhow::Result;
use common::{FakeScreen, RecordingTools, ToolCall, TwoTrees};
use dircmp::compare::Status;
use dircmp::controller::{Command, Movement};
use dircmp::tools::EditTarget;
use dircmp::transfer::Direction;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_copy_left_to_right_patches_the_row() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_both("a.txt", b"same", b"same")?;
    trees.write_left("b.txt", b"only left")?;

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();
    controller.select(1);
    assert_eq!(controller.selected_result().unwrap().status(), Status::OnlyLeft);

    assert!(controller.execute(Command::Copy(Direction::LeftToRight), &mut screen));
    assert!(controller.is_busy());
    assert_eq!(controller.view().status_line(), "Processing...");

    controller.wait_for_completion();

    assert!(!controller.is_busy());
    assert!(!controller.has_pending_copy());
    assert_eq!(controller.status_message(), Some("File copied left → right"));
    assert_eq!(controller.selected_result().unwrap().status(), Status::Identical);
    assert_eq!(fs::read(trees.right.join("b.txt"))?, b"only left");
    assert_eq!(screen.released, 0);
    Ok(())
}

#[test]
fn test_copy_right_to_left_overwrites() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_both("conf.ini", b"old", b"newer")?;

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();
    assert_eq!(controller.results()[0].status(), Status::DifferentSize);

    assert!(controller.execute(Command::Copy(Direction::RightToLeft), &mut screen));
    controller.wait_for_completion();

    assert_eq!(controller.status_message(), Some("File copied right → left"));
    assert_eq!(controller.results()[0].status(), Status::Identical);
    assert_eq!(fs::read(trees.left.join("conf.ini"))?, b"newer");
    Ok(())
}

#[test]
fn test_copy_without_source_reports_and_stays_idle() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_right("r.txt", b"x")?;

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();

    assert!(controller.execute(Command::Copy(Direction::LeftToRight), &mut screen));
    assert!(!controller.is_busy());
    assert!(!controller.has_pending_copy());
    assert!(controller.status_message().unwrap().starts_with("Failed to copy file"));
    assert!(!trees.left.join("r.txt").exists());
    Ok(())
}

#[test]
fn test_commands_are_rejected_while_busy() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_both("a.txt", b"one", b"two")?;

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();

    assert!(controller.execute(Command::Copy(Direction::LeftToRight), &mut screen));
    assert!(controller.is_busy());

    for command in [
        Command::Copy(Direction::RightToLeft),
        Command::Edit(EditTarget::Both),
        Command::Merge,
        Command::ManualMerge,
        Command::Refresh,
    ] {
        assert!(!controller.execute(command, &mut screen));
    }
    assert!(controller.tools().calls.is_empty());
    assert_eq!(screen.released, 0);

    controller.wait_for_completion();
    assert!(!controller.is_busy());
    assert_eq!(fs::read(trees.right.join("a.txt"))?, b"one");
    Ok(())
}

#[test]
fn test_commands_on_empty_list_do_nothing() -> Result<()> {
    let trees = TwoTrees::new()?;
    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();

    assert!(!controller.execute(Command::Edit(EditTarget::Both), &mut screen));
    assert!(!controller.execute(Command::Copy(Direction::LeftToRight), &mut screen));
    assert!(controller.status_message().is_none());
    assert!(controller.tools().calls.is_empty());
    Ok(())
}

#[test]
fn test_poll_completion_eventually_applies_copy() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_left("x", b"payload")?;

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();
    controller.execute(Command::Copy(Direction::LeftToRight), &mut screen);

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
    while !controller.poll_completion() {
        assert!(std::time::Instant::now() < deadline, "copy never finished");
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    assert!(!controller.is_busy());
    assert_eq!(controller.results()[0].status(), Status::Identical);
    assert!(!controller.poll_completion());
    Ok(())
}

#[test]
fn test_edit_both_releases_terminal_and_rescans() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_both("a.txt", b"left", b"right")?;

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();

    assert!(controller.execute(Command::Edit(EditTarget::Both), &mut screen));

    assert_eq!(
        controller.tools().calls,
        vec![ToolCall::Edit(vec![trees.left.join("a.txt"), trees.right.join("a.txt")])]
    );
    assert_eq!((screen.released, screen.reacquired), (1, 1));
    assert!(!controller.is_busy());
    assert_eq!(controller.status_message(), Some("Files edited successfully"));
    Ok(())
}

#[test]
fn test_edit_single_side() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_both("a.txt", b"left", b"right")?;

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();

    controller.execute(Command::Edit(EditTarget::Right), &mut screen);

    assert_eq!(
        controller.tools().calls,
        vec![ToolCall::Edit(vec![trees.right.join("a.txt")])]
    );
    assert_eq!(controller.status_message(), Some("Right file edited successfully"));
    Ok(())
}

#[test]
fn test_edit_missing_side_does_not_launch() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_left("a.txt", b"left")?;

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();

    assert!(controller.execute(Command::Edit(EditTarget::Right), &mut screen));

    assert!(controller.tools().calls.is_empty());
    assert_eq!(screen.released, 0);
    assert_eq!(controller.status_message(), Some("No right file(s) to edit"));
    assert!(!controller.is_busy());
    Ok(())
}

#[test]
fn test_edit_both_with_one_side_opens_what_exists() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_right("only.txt", b"r")?;

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();
    controller.execute(Command::Edit(EditTarget::Both), &mut screen);

    assert_eq!(
        controller.tools().calls,
        vec![ToolCall::Edit(vec![trees.right.join("only.txt")])]
    );
    Ok(())
}

#[test]
fn test_failed_edit_still_reacquires_and_clears_busy() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_both("a.txt", b"l", b"r")?;

    let mut controller = trees.controller(RecordingTools::failing_edit());
    let mut screen = FakeScreen::default();
    controller.execute(Command::Edit(EditTarget::Both), &mut screen);

    assert_eq!((screen.released, screen.reacquired), (1, 1));
    assert!(!controller.is_busy());
    assert_eq!(controller.status_message(), Some("Editor failed or was cancelled"));
    Ok(())
}

#[test]
fn test_rescan_after_edit_clamps_selection() -> Result<()> {
    let trees = TwoTrees::new()?;
    for name in ["a", "b", "c", "d"] {
        trees.write_left(name, b"x")?;
    }
    let doomed: Vec<_> = ["c", "d"].iter().map(|n| trees.left.join(n)).collect();
    let tools = RecordingTools {
        on_edit: Some(Box::new(move |_: &[PathBuf]| {
            for path in &doomed {
                let _ = fs::remove_file(path);
            }
        })),
        ..RecordingTools::default()
    };

    let mut controller = trees.controller(tools);
    let mut screen = FakeScreen::default();
    controller.set_viewport_height(2);
    controller.apply_movement(Movement::End);
    assert_eq!(controller.selected(), 3);

    controller.execute(Command::Edit(EditTarget::Left), &mut screen);

    assert_eq!(controller.results().len(), 2);
    assert_eq!(controller.selected(), 1);
    assert_eq!(controller.scroll_offset(), 0);
    Ok(())
}

#[test]
fn test_merge_text_pair_reports_tool() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_both("doc.txt", b"alpha\n", b"beta\n")?;

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();
    controller.execute(Command::Merge, &mut screen);

    assert_eq!(
        controller.tools().calls,
        vec![ToolCall::Merge(trees.left.join("doc.txt"), trees.right.join("doc.txt"))]
    );
    assert_eq!((screen.released, screen.reacquired), (1, 1));
    assert_eq!(controller.status_message(), Some("Files merged successfully (recorder)"));
    Ok(())
}

#[test]
fn test_merge_refuses_binary_and_one_sided_pairs() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_both("blob", &[0u8, 0, 0, 1], &[0u8, 0, 0, 2])?;
    trees.write_left("lonely.txt", b"text")?;

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();

    for index in 0..2 {
        controller.select(index);
        controller.execute(Command::Merge, &mut screen);
        assert_eq!(
            controller.status_message(),
            Some("Files cannot be merged (missing or binary)")
        );
        controller.execute(Command::ManualMerge, &mut screen);
        assert_eq!(
            controller.status_message(),
            Some("Files cannot be merged (missing or binary)")
        );
    }
    assert!(controller.tools().calls.is_empty());
    assert_eq!(screen.released, 0);
    Ok(())
}

#[test]
fn test_failed_merge_message() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_both("doc.txt", b"alpha\n", b"beta\n")?;

    let tools = RecordingTools {
        fail_merge: true,
        ..RecordingTools::default()
    };
    let mut controller = trees.controller(tools);
    let mut screen = FakeScreen::default();
    controller.execute(Command::Merge, &mut screen);

    assert!(!controller.is_busy());
    assert_eq!(controller.status_message(), Some("Merge failed or was cancelled"));
    Ok(())
}

#[test]
fn test_manual_merge_writes_and_opens_scratch() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_both("sub/doc.txt", b"alpha\n", b"beta\n")?;

    let tools = RecordingTools {
        scratch_dir: Some(trees.temp_dir.path().join("scratch")),
        ..RecordingTools::default()
    };
    let mut controller = trees.controller(tools);
    let mut screen = FakeScreen::default();
    controller.execute(Command::ManualMerge, &mut screen);

    let calls = &controller.tools().calls;
    assert_eq!(calls[0], ToolCall::Scratch("sub/doc.txt".to_string()));
    let ToolCall::Edit(files) = &calls[1] else {
        panic!("expected an edit of the merge file, got {calls:?}");
    };
    assert_eq!(files.len(), 1);
    let scratch = fs::read_to_string(&files[0])?;
    assert!(scratch.contains("# Merge file for: sub/doc.txt"));
    assert!(scratch.contains("alpha"));
    assert!(scratch.contains("beta"));

    let expected = format!("Manual merge completed: {}", files[0].display());
    assert_eq!(controller.status_message(), Some(expected.as_str()));
    Ok(())
}

#[test]
fn test_manual_merge_without_scratch_space() -> Result<()> {
    let trees = TwoTrees::new()?;
    trees.write_both("doc.txt", b"alpha\n", b"beta\n")?;

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();
    controller.execute(Command::ManualMerge, &mut screen);

    assert_eq!(controller.status_message(), Some("Failed to create merge file"));
    assert_eq!(screen.released, 0);
    assert!(!controller.is_busy());
    Ok(())
}

#[test]
fn test_refresh_picks_up_changes_and_resets_position() -> Result<()> {
    let trees = TwoTrees::new()?;
    for i in 0..10 {
        trees.write_left(&format!("f{i}"), b"x")?;
    }

    let mut controller = trees.controller(RecordingTools::default());
    let mut screen = FakeScreen::default();
    controller.set_viewport_height(3);
    controller.apply_movement(Movement::End);
    assert_eq!(controller.scroll_offset(), 7);

    trees.write_right("new", b"y")?;
    assert!(controller.execute(Command::Refresh, &mut screen));

    assert_eq!(controller.results().len(), 11);
    assert_eq!((controller.selected(), controller.scroll_offset()), (0, 0));
    assert_eq!(controller.status_message(), Some("Refreshed"));
    Ok(())
}
