use flowkit_designer::history::{ActionCode, Command, TaskManager, TaskState};

/// Appends a label to a log; undo pops it.
#[derive(Debug, Clone, PartialEq)]
struct Append(&'static str);

impl Command<Vec<&'static str>> for Append {
    fn apply(&mut self, target: &mut Vec<&'static str>) {
        target.push(self.0);
    }

    fn undo(&mut self, target: &mut Vec<&'static str>) {
        assert_eq!(target.pop(), Some(self.0));
    }

    fn name(&self) -> &str {
        self.0
    }
}

fn record(tm: &mut TaskManager<Append>, log: &mut Vec<&'static str>, label: &'static str) {
    let mut cmd = Append(label);
    cmd.apply(log);
    tm.submit(cmd);
}

fn labels(tm: &TaskManager<Append>) -> Vec<&'static str> {
    tm.tasks().iter().map(|t| t.command.0).collect()
}

#[test]
fn test_new_manager_is_empty() {
    let tm: TaskManager<Append> = TaskManager::new(10);
    assert!(!tm.can_undo());
    assert!(!tm.can_redo());
    assert_eq!(tm.current_index(), None);
    assert_eq!(tm.state(), TaskState::Idle);
}

#[test]
fn test_submit_after_undo_truncates_redo() {
    let mut tm = TaskManager::new(0);
    let mut log = Vec::new();
    record(&mut tm, &mut log, "A");
    record(&mut tm, &mut log, "B");
    assert!(tm.undo(&mut log));
    record(&mut tm, &mut log, "C");

    assert_eq!(labels(&tm), vec!["A", "C"]);
    assert_eq!(log, vec!["A", "C"]);
    assert!(!tm.can_redo());
}

#[test]
fn test_group_undoes_in_one_step() {
    let mut tm = TaskManager::new(0);
    let mut log = Vec::new();
    record(&mut tm, &mut log, "A");

    tm.begin_action(ActionCode::Move).unwrap();
    assert_eq!(tm.state(), TaskState::Grouping);
    record(&mut tm, &mut log, "B");
    record(&mut tm, &mut log, "C");
    tm.end_action();

    assert_eq!(tm.undo_depth(), 2);
    tm.undo(&mut log);
    assert_eq!(tm.undo_depth(), 1);
    assert_eq!(log, vec!["A"]);

    tm.redo(&mut log);
    assert_eq!(log, vec!["A", "B", "C"]);
    assert_eq!(tm.tasks()[1].group_code, ActionCode::Move);
}

#[test]
fn test_nested_actions_share_group() {
    let mut tm = TaskManager::new(0);
    let mut log = Vec::new();
    tm.begin_action(ActionCode::Move).unwrap();
    tm.begin_action(ActionCode::Resize).unwrap();
    record(&mut tm, &mut log, "A");
    tm.end_action();
    record(&mut tm, &mut log, "B");
    tm.end_action();

    assert_eq!(tm.undo_depth(), 1);
    assert_eq!(tm.tasks()[0].group, tm.tasks()[1].group);
}

#[test]
fn test_limit_evicts_whole_groups() {
    let mut tm = TaskManager::new(2);
    let mut log = Vec::new();

    tm.begin_action(ActionCode::Create).unwrap();
    record(&mut tm, &mut log, "A1");
    record(&mut tm, &mut log, "A2");
    tm.end_action();
    record(&mut tm, &mut log, "B");
    record(&mut tm, &mut log, "C");

    assert_eq!(labels(&tm), vec!["B", "C"]);
    assert_eq!(tm.undo_depth(), 2);

    tm.set_undo_limit(1);
    assert_eq!(labels(&tm), vec!["C"]);
}

#[test]
fn test_skip_and_disable_drop_commands() {
    let mut tm = TaskManager::new(0);
    tm.set_skip(true);
    assert!(!tm.submit(Append("A")));
    tm.set_skip(false);
    assert!(tm.submit(Append("B")));

    tm.set_enabled(false);
    assert!(tm.is_empty());
    assert!(!tm.submit(Append("C")));
}

#[test]
fn test_remove_last_task_reverts_and_forgets() {
    let mut tm = TaskManager::new(0);
    let mut log = Vec::new();
    record(&mut tm, &mut log, "A");
    record(&mut tm, &mut log, "B");

    assert!(tm.remove_last_task(&mut log));
    assert_eq!(log, vec!["A"]);
    assert_eq!(labels(&tm), vec!["A"]);
    assert!(!tm.can_redo());
}

#[test]
fn test_group_ids_increase_per_action() {
    let mut tm = TaskManager::new(0);
    let mut log = Vec::new();
    record(&mut tm, &mut log, "A");
    record(&mut tm, &mut log, "B");
    let groups: Vec<u64> = tm.tasks().iter().map(|t| t.group).collect();
    assert!(groups[0] < groups[1]);
}

#[test]
fn test_skipped_implicit_groups_use_no_ids() {
    let mut tm = TaskManager::new(0);
    let mut log = Vec::new();
    record(&mut tm, &mut log, "A");

    tm.set_skip(true);
    for _ in 0..10 {
        let opened = tm.begin_implicit(ActionCode::Move);
        assert!(!opened);
        assert!(!tm.submit(Append("skipped")));
        tm.end_implicit(opened);
    }
    tm.set_skip(false);

    let opened = tm.begin_implicit(ActionCode::Move);
    assert!(opened);
    record(&mut tm, &mut log, "B");
    tm.end_implicit(opened);

    let groups: Vec<u64> = tm.tasks().iter().map(|t| t.group).collect();
    assert_eq!(groups[1], groups[0] + 1);
    assert_eq!(tm.tasks()[1].group_code, ActionCode::Move);
}

#[test]
fn test_undo_on_empty_history() {
    let mut tm: TaskManager<Append> = TaskManager::new(0);
    let mut log = Vec::new();
    assert!(!tm.undo(&mut log));
    assert!(!tm.redo(&mut log));
    assert!(!tm.remove_last_task(&mut log));
}
