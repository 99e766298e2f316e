//! Engine built-in procedures.
//!
//! Built-ins are resolved only after user symbols, so a script may declare
//! its own `random` and every call will bind to it. They are never interned
//! and never carry references; a node names one by its index in [`BUILTINS`].

/// One engine opcode callable from scripts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Builtin {
    pub name: &'static str,
    pub min_args: u32,
    pub max_args: u32,
}

impl Builtin {
    const fn new(name: &'static str, min_args: u32, max_args: u32) -> Self {
        Builtin {
            name,
            min_args,
            max_args,
        }
    }

    const fn fixed(name: &'static str, args: u32) -> Self {
        Self::new(name, args, args)
    }

    pub fn accepts(&self, argc: u32) -> bool {
        (self.min_args..=self.max_args).contains(&argc)
    }
}

/// The opcode table, indexed by `NodeKind::Builtin` payloads.
pub static BUILTINS: &[Builtin] = &[
    // Messages and output
    Builtin::fixed("display_msg", 1),
    Builtin::fixed("debug_msg", 1),
    Builtin::new("float_msg", 2, 3),
    Builtin::fixed("message_str", 2),
    Builtin::fixed("obj_name", 1),
    // Globals, map and local variables
    Builtin::fixed("global_var", 1),
    Builtin::fixed("set_global_var", 2),
    Builtin::fixed("map_var", 1),
    Builtin::fixed("set_map_var", 2),
    Builtin::fixed("local_var", 1),
    Builtin::fixed("set_local_var", 2),
    Builtin::fixed("export_var", 2),
    // Time and randomness
    Builtin::fixed("game_time", 0),
    Builtin::fixed("game_time_hour", 0),
    Builtin::fixed("game_ticks", 1),
    Builtin::fixed("random", 2),
    Builtin::fixed("add_timer_event", 3),
    Builtin::new("rm_timer_event", 1, 2),
    // Script context
    Builtin::fixed("self_obj", 0),
    Builtin::fixed("source_obj", 0),
    Builtin::fixed("target_obj", 0),
    Builtin::fixed("dude_obj", 0),
    Builtin::fixed("fixed_param", 0),
    Builtin::fixed("script_action", 0),
    Builtin::fixed("script_overrides", 0),
    // Objects
    Builtin::fixed("create_object_sid", 4),
    Builtin::fixed("destroy_object", 1),
    Builtin::fixed("obj_pid", 1),
    Builtin::fixed("obj_type", 1),
    Builtin::fixed("obj_is_open", 1),
    Builtin::fixed("obj_open", 1),
    Builtin::fixed("obj_close", 1),
    Builtin::fixed("obj_is_locked", 1),
    Builtin::fixed("obj_lock", 1),
    Builtin::fixed("obj_unlock", 1),
    Builtin::fixed("tile_num", 1),
    Builtin::fixed("elevation", 1),
    Builtin::fixed("move_to", 3),
    Builtin::fixed("tile_distance_objs", 2),
    Builtin::fixed("obj_can_see_obj", 2),
    // Critters
    Builtin::fixed("get_critter_stat", 2),
    Builtin::fixed("set_critter_stat", 3),
    Builtin::fixed("critter_heal", 2),
    Builtin::fixed("critter_dmg", 3),
    Builtin::fixed("critter_attempt_placement", 3),
    Builtin::fixed("has_skill", 2),
    Builtin::fixed("is_critter_dead", 1),
    Builtin::fixed("attack_complex", 8),
    // Inventory
    Builtin::fixed("add_obj_to_inven", 2),
    Builtin::fixed("rm_obj_from_inven", 2),
    Builtin::fixed("obj_carrying_pid_obj", 2),
    Builtin::fixed("item_caps_total", 1),
    Builtin::fixed("item_caps_adjust", 2),
    // Dialogue
    Builtin::fixed("start_gdialog", 5),
    Builtin::fixed("gsay_start", 0),
    Builtin::fixed("gsay_end", 0),
    Builtin::fixed("gsay_reply", 2),
    Builtin::fixed("giq_option", 5),
    Builtin::fixed("end_dialogue", 0),
    // Game state
    Builtin::fixed("give_exp_points", 1),
    Builtin::fixed("load_map", 2),
    Builtin::fixed("play_sfx", 1),
    Builtin::fixed("gfade_in", 1),
    Builtin::fixed("gfade_out", 1),
    Builtin::fixed("terminate_combat", 0),
    Builtin::fixed("set_light_level", 1),
];

/// Look up a built-in by name; names match ASCII case-insensitively like
/// the keywords they used to be.
pub fn find(name: &str) -> Option<usize> {
    BUILTINS
        .iter()
        .position(|b| b.name.eq_ignore_ascii_case(name))
}

/// Built-in at `index`, if any.
pub fn get(index: usize) -> Option<&'static Builtin> {
    BUILTINS.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let idx = find("Display_Msg");
        assert_eq!(idx, find("display_msg"));
        assert_eq!(idx.and_then(get).map(|b| b.name), Some("display_msg"));
        assert_eq!(find("no_such_opcode"), None);
    }

    #[test]
    fn test_arity_range() {
        let float_msg = find("float_msg").and_then(get);
        assert_eq!(float_msg.map(|b| b.accepts(2)), Some(true));
        assert_eq!(float_msg.map(|b| b.accepts(3)), Some(true));
        assert_eq!(float_msg.map(|b| b.accepts(4)), Some(false));
    }

    #[test]
    fn test_names_are_unique() {
        for (idx, builtin) in BUILTINS.iter().enumerate() {
            assert_eq!(find(builtin.name), Some(idx), "{} is shadowed", builtin.name);
        }
    }
}
