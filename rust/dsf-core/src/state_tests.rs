#[cfg(test)]
mod tests {
    use crate::state::{
        classify_label, has_marker, split_label, state_from_pairs, tokens_after_marker, LabelKind,
        ACTION_MARKER, INTENT_MARKER,
    };

    #[test]
    fn prev_prefix_is_stripped_for_previous_actions() {
        assert_eq!(
            classify_label("prev_action_listen"),
            LabelKind::PrevAction("action_listen")
        );
        assert_eq!(classify_label("intent_greet"), LabelKind::Current("intent_greet"));
        // Only a leading prefix counts.
        assert_eq!(classify_label("slot_prev_0"), LabelKind::Current("slot_prev_0"));
    }

    #[test]
    fn split_drops_empty_parts() {
        let parts: Vec<&str> = split_label("ef__gh_").collect();
        assert_eq!(parts, vec!["ef", "gh"]);
        assert_eq!(split_label("").count(), 0);
    }

    #[test]
    fn marker_is_removed_only_in_leading_position() {
        assert_eq!(
            tokens_after_marker("intent_greet_formal", INTENT_MARKER),
            vec!["greet", "formal"]
        );
        assert_eq!(
            tokens_after_marker("utter_action_plan", ACTION_MARKER),
            vec!["utter", "action", "plan"]
        );
        assert!(tokens_after_marker("action", ACTION_MARKER).is_empty());
        assert!(has_marker("intent_a", INTENT_MARKER));
        assert!(!has_marker("intention_a", INTENT_MARKER));
    }

    #[test]
    fn state_from_pairs_keeps_last_weight_for_duplicate_labels() {
        let s = state_from_pairs([("a", 1.0), ("b", 0.5), ("a", 0.25)]);
        assert_eq!(s.len(), 2);
        assert_eq!(s["a"], 0.25);
        assert_eq!(s["b"], 0.5);
    }
}
