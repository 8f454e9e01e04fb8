//! Simulation handlers used until real hardware drivers are attached.

use super::action_id::ActionId;
use super::catalogue::ActionCatalogue;
use super::descriptor::{action_handler, ActionHandler, DispatchContext};

/// Describe a dispatch the way the motor log prints it.
pub fn describe_dispatch(id: ActionId, context: &DispatchContext) -> String {
    let mut line = format!("Executing: {}", id);
    if let Some(face) = &context.face {
        line.push_str(&format!(
            " [Target: x={:.2} y={:.2} area={:.2}]",
            face.center_x, face.center_y, face.area
        ));
    }
    if let Some(gesture) = &context.gesture {
        line.push_str(&format!(" [Gesture: {}]", gesture));
    }
    line
}

/// Handler that only logs what the hardware would do.
pub fn logging_handler() -> ActionHandler {
    action_handler(|id, context| {
        log::info!("[hardware] {}", describe_dispatch(id, context));
        Ok(())
    })
}

/// Bind [`logging_handler`] to every action that has no handler yet.
///
/// Returns how many actions were bound.
pub fn attach_logging_handlers(catalogue: &ActionCatalogue) -> usize {
    let unbound: Vec<ActionId> = catalogue
        .all()
        .map(|d| d.id)
        .filter(|id| !catalogue.has_handler(*id))
        .collect();
    for id in &unbound {
        catalogue.attach_handler(*id, logging_handler());
    }
    unbound.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::DispatchOutcome;
    use crate::perception::{FaceTarget, Gesture};

    #[test]
    fn test_describe_dispatch_with_context() {
        let ctx = DispatchContext::new(
            Some(FaceTarget::new(0.25, 0.5, 0.1, 0.9)),
            Some(Gesture::ThumbUp),
        );
        assert_eq!(
            describe_dispatch(ActionId::FollowPerson, &ctx),
            "Executing: FOLLOW_PERSON [Target: x=0.25 y=0.50 area=0.10] [Gesture: Thumb_Up]"
        );
        assert_eq!(
            describe_dispatch(ActionId::Stretch, &DispatchContext::default()),
            "Executing: STRETCH"
        );
    }

    #[test]
    fn test_attach_logging_handlers_skips_bound() {
        let catalogue = ActionCatalogue::with_defaults();
        catalogue.attach_handler(ActionId::Stretch, action_handler(|_, _| Ok(())));
        let bound = attach_logging_handlers(&catalogue);
        assert_eq!(bound, ActionId::ALL.len() - 1);
        for id in ActionId::ALL {
            assert!(catalogue.has_handler(id));
        }
        assert_eq!(
            catalogue.dispatch(ActionId::GoToSleep, &DispatchContext::default()),
            DispatchOutcome::Executed
        );
    }
}
