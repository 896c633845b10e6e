//! Component graph cycle detection
//!
//! Three-color depth-first search started from every component, so
//! subgraphs unreachable from the root are covered too. The walk keeps an
//! explicit stack instead of recursing, which bounds native stack use on
//! deep graphs.

use std::collections::HashMap;

use super::component::Component;
use super::error::{SceneError, SceneResult};
use super::table::Table;

/// Visit state; components absent from the map are unvisited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnStack,
    Done,
}

/// Whether following child references from any component can return to it
///
/// Child ids that are not in the table are treated as leaves.
pub fn has_cycle(components: &Table<Component>) -> bool {
    let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(components.len());
    let mut starts: Vec<&str> = components.ids().collect();
    starts.sort_unstable();

    for start in starts {
        if marks.contains_key(start) {
            continue;
        }

        // (component, index of the next child to visit)
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        marks.insert(start, Mark::OnStack);

        while let Some(top) = stack.last_mut() {
            let (id, next) = *top;
            let child = components
                .get(id)
                .and_then(|component| component.children.get(next));

            if let Some(child) = child {
                top.1 += 1;
                match marks.get(child.as_str()) {
                    Some(Mark::OnStack) => return true,
                    Some(Mark::Done) => {}
                    None if components.contains(child) => {
                        marks.insert(child.as_str(), Mark::OnStack);
                        stack.push((child.as_str(), 0));
                    }
                    None => {}
                }
            } else {
                marks.insert(id, Mark::Done);
                stack.pop();
            }
        }
    }

    false
}

/// Fail with [`SceneError::CycleDetected`] if the component graph has a cycle
pub fn validate(components: &Table<Component>) -> SceneResult<()> {
    if has_cycle(components) {
        log::error!("Scene graph contains cycle");
        Err(SceneError::CycleDetected)
    } else {
        log::debug!("Component graph of {} nodes is acyclic", components.len());
        Ok(())
    }
}
