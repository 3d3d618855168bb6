//! Reordering the flat task collection after a card is dropped somewhere.
//!
//! Lanes are never stored separately: a lane is the subsequence of tasks that
//! share a status. A move is computed by splitting the collection into lanes,
//! splicing the moved task into its destination lane, and writing the lanes
//! back into the slots of the original sequence.

use std::collections::VecDeque;

use crate::model::task::{Status, Task};

/// Where a dragged task was released
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Onto another task card
    Task(String),
    /// Onto a lane itself (empty column area or below the last card)
    Lane(Status),
}

impl DropTarget {
    /// Interpret a drop-target identifier. Lane identifiers have the form
    /// `column-<status>`; anything else names a task.
    pub fn parse(id: &str) -> DropTarget {
        match Status::from_lane_id(id) {
            Some(status) => DropTarget::Lane(status),
            None => DropTarget::Task(id.to_string()),
        }
    }
}

/// Tasks of one lane, in board order
pub fn lane(tasks: &[Task], status: Status) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status == status).collect()
}

/// Compute the collection that results from dropping `dragged_id` on
/// `target`. Returns `None` when the drop changes nothing: unknown ids, a
/// drop onto itself, or a move that lands the task where it already was.
///
/// - Lane target: the task takes the lane's status and goes to the end of it.
/// - Task target: the task takes the target's status and is inserted
///   immediately before the target within that lane.
///
/// Tasks in lanes not involved in the move keep their exact positions.
pub fn reconcile(tasks: &[Task], dragged_id: &str, target: &DropTarget) -> Option<Vec<Task>> {
    let from = tasks.iter().position(|t| t.id == dragged_id)?;

    let (new_status, anchor) = match target {
        DropTarget::Task(id) if id == dragged_id => return None,
        DropTarget::Task(id) => {
            let over = tasks.iter().find(|t| &t.id == id)?;
            (over.status, Some(id.as_str()))
        }
        DropTarget::Lane(status) => (*status, None),
    };

    let mut moved = tasks[from].clone();
    moved.status = new_status;

    // Per-lane subsequences without the moved task
    let mut lanes: [Vec<Task>; 3] = Default::default();
    for (i, task) in tasks.iter().enumerate() {
        if i != from {
            lanes[task.status.index()].push(task.clone());
        }
    }

    let dest = &mut lanes[new_status.index()];
    match anchor {
        Some(anchor_id) => {
            let at = dest.iter().position(|t| t.id == anchor_id)?;
            dest.insert(at, moved);
        }
        None => dest.push(moved),
    }

    // The moved task's old slot now belongs to its new lane, so each lane has
    // exactly as many slots as tasks.
    let mut queues = lanes.map(VecDeque::from);
    let mut result = Vec::with_capacity(tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        let slot_status = if i == from { new_status } else { task.status };
        result.push(queues[slot_status.index()].pop_front()?);
    }

    let unchanged = result
        .iter()
        .zip(tasks)
        .all(|(a, b)| a.id == b.id && a.status == b.status);
    if unchanged { None } else { Some(result) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskDraft;
    use chrono::DateTime;

    fn task(id: &str, status: Status) -> Task {
        let mut draft = TaskDraft::new(format!("Task {}", id));
        draft.status = status;
        draft.into_task(id.to_string(), DateTime::from_timestamp(0, 0).unwrap())
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn lane_ids(tasks: &[Task], status: Status) -> Vec<&str> {
        lane(tasks, status).into_iter().map(|t| t.id.as_str()).collect()
    }

    fn to_task(id: &str) -> DropTarget {
        DropTarget::Task(id.to_string())
    }

    use Status::{Completed, InProgress, Pending};

    #[test]
    fn parse_distinguishes_lanes_from_tasks() {
        assert_eq!(
            DropTarget::parse("column-completed"),
            DropTarget::Lane(Completed)
        );
        assert_eq!(DropTarget::parse("task-42"), to_task("task-42"));
        // Not a known lane: treated as a task id (and later not found)
        assert_eq!(DropTarget::parse("column-archived"), to_task("column-archived"));
    }

    #[test]
    fn same_lane_inserts_before_target() {
        let tasks = vec![task("A", Pending), task("B", Pending), task("C", Pending)];
        let result = reconcile(&tasks, "A", &to_task("C")).unwrap();
        assert_eq!(ids(&result), vec!["B", "A", "C"]);
    }

    #[test]
    fn same_lane_move_up() {
        let tasks = vec![task("A", Pending), task("B", Pending), task("C", Pending)];
        let result = reconcile(&tasks, "C", &to_task("A")).unwrap();
        assert_eq!(ids(&result), vec!["C", "A", "B"]);
    }

    #[test]
    fn same_lane_same_position_is_noop() {
        // A is already directly before B
        let tasks = vec![task("A", Pending), task("B", Pending), task("C", Pending)];
        assert!(reconcile(&tasks, "A", &to_task("B")).is_none());
    }

    #[test]
    fn same_lane_reorder_keeps_other_lanes_in_place() {
        let tasks = vec![
            task("A", Pending),
            task("X", InProgress),
            task("B", Pending),
            task("Y", Completed),
            task("C", Pending),
        ];
        let result = reconcile(&tasks, "C", &to_task("A")).unwrap();
        assert_eq!(ids(&result), vec!["C", "X", "A", "Y", "B"]);
        assert_eq!(result[1].id, "X");
        assert_eq!(result[3].id, "Y");
    }

    #[test]
    fn cross_lane_onto_task() {
        let tasks = vec![
            task("P1", Pending),
            task("P2", Pending),
            task("I1", InProgress),
            task("C1", Completed),
            task("C2", Completed),
        ];
        let result = reconcile(&tasks, "P1", &to_task("I1")).unwrap();
        assert_eq!(lane_ids(&result, Pending), vec!["P2"]);
        assert_eq!(lane_ids(&result, InProgress), vec!["P1", "I1"]);
        assert_eq!(lane_ids(&result, Completed), vec!["C1", "C2"]);
        assert_eq!(result[3].id, "C1");
        assert_eq!(result[4].id, "C2");

        let moved = result.iter().find(|t| t.id == "P1").unwrap();
        assert_eq!(moved.status, InProgress);
    }

    #[test]
    fn cross_lane_into_middle_of_lane() {
        let tasks = vec![
            task("I1", InProgress),
            task("P1", Pending),
            task("I2", InProgress),
            task("I3", InProgress),
        ];
        let result = reconcile(&tasks, "P1", &to_task("I3")).unwrap();
        assert_eq!(lane_ids(&result, InProgress), vec!["I1", "I2", "P1", "I3"]);
        assert!(lane_ids(&result, Pending).is_empty());
    }

    #[test]
    fn lane_drop_goes_to_end_of_lane() {
        let tasks = vec![
            task("C1", Completed),
            task("P1", Pending),
            task("C2", Completed),
            task("P2", Pending),
        ];
        let result = reconcile(&tasks, "P1", &DropTarget::Lane(Completed)).unwrap();
        assert_eq!(lane_ids(&result, Completed), vec!["C1", "C2", "P1"]);
        assert_eq!(lane_ids(&result, Pending), vec!["P2"]);
    }

    #[test]
    fn lane_drop_on_own_lane_moves_to_end() {
        let tasks = vec![task("A", Pending), task("X", InProgress), task("B", Pending)];
        let result = reconcile(&tasks, "A", &DropTarget::Lane(Pending)).unwrap();
        assert_eq!(ids(&result), vec!["B", "X", "A"]);
    }

    #[test]
    fn lane_drop_when_already_last_is_noop() {
        let tasks = vec![task("A", Pending), task("B", Pending)];
        assert!(reconcile(&tasks, "B", &DropTarget::Lane(Pending)).is_none());
    }

    #[test]
    fn lane_drop_into_empty_lane_keeps_flat_slot() {
        let tasks = vec![task("A", Pending), task("B", Pending), task("C", Pending)];
        let result = reconcile(&tasks, "B", &DropTarget::Lane(Completed)).unwrap();
        assert_eq!(ids(&result), vec!["A", "B", "C"]);
        assert_eq!(result[1].status, Completed);
    }

    #[test]
    fn drop_on_itself_is_noop() {
        let tasks = vec![task("A", Pending), task("B", InProgress)];
        assert!(reconcile(&tasks, "A", &to_task("A")).is_none());
    }

    #[test]
    fn unknown_ids_are_noop() {
        let tasks = vec![task("A", Pending), task("B", InProgress)];
        assert!(reconcile(&tasks, "missing", &to_task("B")).is_none());
        assert!(reconcile(&tasks, "A", &to_task("missing")).is_none());
        assert!(reconcile(&[], "A", &DropTarget::Lane(Pending)).is_none());
    }

    #[test]
    fn move_keeps_every_task_exactly_once() {
        let tasks = vec![
            task("A", Pending),
            task("B", InProgress),
            task("C", Completed),
            task("D", Pending),
            task("E", InProgress),
        ];
        for dragged in ["A", "B", "C", "D", "E"] {
            for over in ["A", "B", "C", "D", "E"] {
                if let Some(result) = reconcile(&tasks, dragged, &to_task(over)) {
                    let mut got = ids(&result);
                    got.sort();
                    assert_eq!(got, vec!["A", "B", "C", "D", "E"]);
                }
            }
        }
    }
}
