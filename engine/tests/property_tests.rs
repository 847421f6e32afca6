use proptest::prelude::*;

use colloquy_engine::config::Config;
use colloquy_engine::session::template::{expand, VariableBindings};
use colloquy_engine::session::Session;

proptest! {
    // Configuration survives a serialize/parse round trip.
    #[test]
    fn test_config_round_trip(
        log_level in "error|warn|info|debug|trace",
        model in "[a-z][a-z0-9.:-]{0,20}",
        max_loops in 1usize..=100,
    ) {
        let mut config = Config::default();
        config.core.log_level = log_level;
        config.model.default = model;
        config.loop_policy.default_max_loops = max_loops;

        let serialized = toml::to_string(&config).expect("Failed to serialize config");
        let parsed: Config = toml::from_str(&serialized).expect("Failed to parse config");

        prop_assert_eq!(parsed.core.log_level, config.core.log_level);
        prop_assert_eq!(parsed.model.default, config.model.default);
        prop_assert_eq!(parsed.loop_policy.default_max_loops, config.loop_policy.default_max_loops);
        prop_assert_eq!(parsed.loop_policy.bound_policy, config.loop_policy.bound_policy);
    }

    // A bound placeholder always expands to exactly its value.
    #[test]
    fn test_template_expands_bound_placeholder(
        name in "[A-Za-z_][A-Za-z0-9_]{0,15}",
        value in "[^$]{0,40}",
    ) {
        let bindings = VariableBindings::new().set(name.clone(), value.clone());
        let expanded = expand(&format!("<${{{name}}}>"), &bindings);
        prop_assert_eq!(expanded, format!("<{value}>"));
    }

    // Text without placeholders passes through expansion unchanged.
    #[test]
    fn test_template_no_placeholder_is_identity(text in "[^$]{0,60}") {
        let bindings = VariableBindings::new().set("x", "y");
        prop_assert_eq!(expand(&text, &bindings), text);
    }

    // Deriving a session never disturbs the parent, whatever the inputs.
    #[test]
    fn test_derivation_preserves_parent(
        prompts in prop::collection::vec("[^$]{0,20}", 0..5),
        var_name in "[A-Za-z_][A-Za-z0-9_]{0,10}",
        var_value in ".{0,20}",
    ) {
        let mut parent = Session::new("m");
        for p in &prompts {
            parent = parent.with_prompt(p.clone());
        }
        let parent_len = parent.history().len();

        let child = parent
            .with_prompt("one more")
            .with_prompt_var(var_name, var_value);

        prop_assert_eq!(parent.history().len(), parent_len);
        prop_assert!(parent.bindings().is_empty());
        prop_assert_eq!(child.history().len(), parent_len + 1);
    }
}
