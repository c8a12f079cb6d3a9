//! The transition condition algebra: AND chains, OR forks, group fan-out
//! and the broadcast rule.

use animator_forge::prelude::*;

fn setup() -> (Author, LayerBuilder) {
    let author = Author::new(AuthorConfig::new("CondFx", "cond_fx"));
    let layer = author.create_main_layer();
    (author, layer)
}

fn state_edges<'a>(
    controller: &'a Controller,
    source: &StateBuilder,
    target: &StateBuilder,
) -> Vec<&'a Transition> {
    controller.layers[0].state_machine.transitions_between(
        TransitionSource::State(source.id()),
        TransitionTarget::State(target.id()),
    )
}

#[test]
fn or_forks_settings_identical_siblings() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let b = layer.new_state("B");
    let hot = layer.bool_parameter("Hot")?;
    let cold = layer.bool_parameter("Cold")?;

    a.transitions_to(&b)
        .with_transition_duration_seconds(0.25)
        .with_source_interruption()
        .when(hot.is_true())
        .or()
        .when(cold.is_true());

    let controller = author.controller();
    let siblings = state_edges(&controller, &a, &b);
    assert_eq!(siblings.len(), 2);
    assert_eq!(siblings[0].settings, siblings[1].settings);
    assert_eq!(siblings[0].settings.duration, 0.25);
    assert_eq!(
        siblings[0].settings.interruption_source,
        InterruptionSource::Source
    );
    assert_eq!(
        siblings[0].conditions,
        vec![Condition {
            parameter: "Hot".into(),
            mode: ConditionMode::If,
            threshold: 0.0,
        }]
    );
    assert_eq!(
        siblings[1].conditions,
        vec![Condition {
            parameter: "Cold".into(),
            mode: ConditionMode::If,
            threshold: 0.0,
        }]
    );
    Ok(())
}

#[test]
fn and_extends_the_conjunction_on_one_transition() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let b = layer.new_state("B");
    let open = layer.bool_parameter("Open")?;
    let count = layer.int_parameter("Count")?;
    let heat = layer.float_parameter("Heat")?;

    a.transitions_to(&b)
        .when(open.is_true())
        .and(count.is_greater_than(2))
        .and(heat.is_less_than(0.5));

    let controller = author.controller();
    let siblings = state_edges(&controller, &a, &b);
    assert_eq!(siblings.len(), 1);
    let modes: Vec<_> = siblings[0].conditions.iter().map(|c| c.mode).collect();
    assert_eq!(
        modes,
        vec![ConditionMode::If, ConditionMode::Greater, ConditionMode::Less]
    );
    assert_eq!(siblings[0].conditions[1].threshold, 2.0);
    Ok(())
}

#[test]
fn and_after_an_or_group_broadcasts_to_every_branch() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let b = layer.new_state("B");
    let group = layer.bool_parameters(&["P", "Q", "R"])?;
    let local = layer.bool_parameter("Local")?;

    let branches = a
        .transitions_to(&b)
        .when_any(group.is_any_true())
        .and(local.is_true());
    assert_eq!(branches.branch_count(), 3);

    let controller = author.controller();
    let siblings = state_edges(&controller, &a, &b);
    assert_eq!(siblings.len(), 3);
    let total: usize = siblings.iter().map(|t| t.conditions.len()).sum();
    assert_eq!(total, 6);
    for (transition, disjunct) in siblings.iter().zip(["P", "Q", "R"]) {
        assert_eq!(transition.conditions.len(), 2);
        assert_eq!(transition.conditions[0].parameter, disjunct);
        assert_eq!(transition.conditions[1].parameter, "Local");
    }
    Ok(())
}

#[test]
fn and_all_broadcasts_closure_conditions_to_each_branch() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let b = layer.new_state("B");
    let group = layer.bool_parameters(&["P", "Q"])?;
    let x = layer.bool_parameter("X")?;
    let y = layer.int_parameter("Y")?;

    a.transitions_to(&b)
        .when_any(group.is_any_true())
        .and_all(|c| {
            c.and(x.is_true()).and(y.is_equal_to(1));
        });

    let controller = author.controller();
    let siblings = state_edges(&controller, &a, &b);
    assert_eq!(siblings.len(), 2);
    for transition in &siblings {
        assert_eq!(transition.conditions.len(), 3);
        assert_eq!(transition.conditions[1].parameter, "X");
        assert_eq!(transition.conditions[2].parameter, "Y");
    }
    Ok(())
}

#[test]
fn or_after_a_group_forks_from_the_group_template() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let b = layer.new_state("B");
    let group = layer.bool_parameters(&["P", "Q", "R"])?;
    let fallback = layer.bool_parameter("Fallback")?;

    a.transitions_to(&b)
        .with_transition_duration_seconds(0.5)
        .when_any(group.is_any_true())
        .or()
        .when(fallback.is_true());

    let controller = author.controller();
    let siblings = state_edges(&controller, &a, &b);
    assert_eq!(siblings.len(), 4);
    for transition in &siblings {
        assert_eq!(transition.settings.duration, 0.5);
        assert_eq!(transition.conditions.len(), 1);
    }
    assert_eq!(siblings[3].conditions[0].parameter, "Fallback");
    Ok(())
}

#[test]
fn a_single_disjunct_group_stays_on_one_transition() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let b = layer.new_state("B");
    let group = layer.bool_parameters(&["Solo"])?;

    let branches = a.transitions_to(&b).when_any(group.is_any_true());
    assert_eq!(branches.branch_count(), 1);

    let controller = author.controller();
    assert_eq!(state_edges(&controller, &a, &b).len(), 1);
    Ok(())
}

#[test]
fn entry_transitions_support_or_siblings() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let go = layer.bool_parameter("Go")?;
    let alt = layer.bool_parameter("Alt")?;

    layer
        .entry_transitions_to(&a)
        .when(go.is_true())
        .or()
        .when(alt.is_false());

    let controller = author.controller();
    let siblings = controller.layers[0].state_machine.transitions_between(
        TransitionSource::Entry,
        TransitionTarget::State(a.id()),
    );
    assert_eq!(siblings.len(), 2);
    assert_eq!(siblings[0].conditions[0].parameter, "Go");
    assert_eq!(siblings[1].conditions[0].mode, ConditionMode::IfNot);
    Ok(())
}

#[test]
fn exit_transitions_fork_exit_siblings() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let done = layer.bool_parameter("Done")?;
    let abort = layer.trigger_parameter("Abort")?;

    a.exits()
        .with_transition_duration_seconds(0.1)
        .when(done.is_true())
        .or()
        .when(abort.is_true());

    let controller = author.controller();
    let siblings = controller.layers[0].state_machine.transitions_between(
        TransitionSource::State(a.id()),
        TransitionTarget::Exit,
    );
    assert_eq!(siblings.len(), 2);
    assert_eq!(siblings[0].settings.duration, 0.1);
    assert_eq!(siblings[1].settings.duration, 0.1);
    // a fired trigger is observed as bool == true
    assert_eq!(siblings[1].conditions[0].parameter, "Abort");
    assert_eq!(siblings[1].conditions[0].mode, ConditionMode::If);
    Ok(())
}

#[test]
fn any_state_or_siblings_stay_any_state_edges() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let p = layer.bool_parameter("P")?;
    let q = layer.bool_parameter("Q")?;

    layer
        .any_state_transitions_to(&a)
        .with_no_transition_to_self()
        .when(p.is_true())
        .or()
        .when(q.is_true());

    let controller = author.controller();
    let siblings = controller.layers[0].state_machine.transitions_between(
        TransitionSource::AnyState,
        TransitionTarget::State(a.id()),
    );
    assert_eq!(siblings.len(), 2);
    assert!(!siblings[1].settings.can_transition_to_self);
    Ok(())
}

#[test]
fn when_all_chains_conjunctions_in_a_closure() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let b = layer.new_state("B");
    let p = layer.bool_parameter("P")?;
    let q = layer.int_parameter("Q")?;

    a.transitions_to(&b).when_all(|c| {
        c.and(p.is_true()).and(q.is_greater_than(2));
    });

    let controller = author.controller();
    let siblings = state_edges(&controller, &a, &b);
    assert_eq!(siblings.len(), 1);
    assert_eq!(siblings[0].conditions.len(), 2);
    Ok(())
}

#[test]
fn when_composed_allows_or_inside_and_only_or_after() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let b = layer.new_state("B");
    let p = layer.bool_parameter("P")?;
    let q = layer.int_parameter("Q")?;
    let r = layer.bool_parameter("R")?;

    let only_or = a.transitions_to(&b).when_composed(|head| {
        head.when(p.is_true()).or().when(q.is_equal_to(3));
    });
    only_or.or().when(r.is_true());

    let controller = author.controller();
    let siblings = state_edges(&controller, &a, &b);
    assert_eq!(siblings.len(), 3);
    assert_eq!(siblings[0].conditions[0].parameter, "P");
    assert_eq!(siblings[1].conditions[0].parameter, "Q");
    assert_eq!(siblings[2].conditions[0].parameter, "R");
    Ok(())
}

#[test]
fn when_conditions_starts_an_empty_conjunction() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let b = layer.new_state("B");
    let p = layer.bool_parameter("P")?;

    let c = layer.new_state("C");
    a.transitions_to(&c).when_conditions();
    a.transitions_to(&b).when_conditions().and(p.is_true());

    let controller = author.controller();
    assert!(state_edges(&controller, &a, &c)[0].conditions.is_empty());
    assert_eq!(state_edges(&controller, &a, &b)[0].conditions.len(), 1);
    Ok(())
}

#[test]
fn enum_or_groups_fan_out_and_not_any_of_conjoins() -> BuildResult<()> {
    #[derive(Clone, Copy)]
    enum Gesture {
        Fist = 1,
        Open = 2,
        Point = 3,
    }

    impl From<Gesture> for i32 {
        fn from(gesture: Gesture) -> i32 {
            gesture as i32
        }
    }

    let (author, layer) = setup();
    let a = layer.new_state("A");
    let b = layer.new_state("B");
    let gesture = layer.enum_parameter::<Gesture>("Gesture")?;

    a.transitions_from_any()
        .when_any(gesture.is_any_of(&[Gesture::Fist, Gesture::Open]));
    b.transitions_from_any()
        .when(gesture.is_not_any_of(&[Gesture::Point]));

    let controller = author.controller();
    let machine = &controller.layers[0].state_machine;

    let to_a = machine.transitions_between(
        TransitionSource::AnyState,
        TransitionTarget::State(a.id()),
    );
    assert_eq!(to_a.len(), 2);
    assert_eq!(to_a[0].conditions[0].threshold, 1.0);
    assert_eq!(to_a[1].conditions[0].threshold, 2.0);
    assert_eq!(to_a[0].conditions[0].mode, ConditionMode::Equals);

    let to_b = machine.transitions_between(
        TransitionSource::AnyState,
        TransitionTarget::State(b.id()),
    );
    assert_eq!(to_b.len(), 1);
    assert_eq!(to_b[0].conditions[0].mode, ConditionMode::NotEqual);
    assert_eq!(to_b[0].conditions[0].threshold, 3.0);
    Ok(())
}

#[test]
fn group_conjunction_sources_apply_to_a_single_transition() -> BuildResult<()> {
    let (author, layer) = setup();
    let a = layer.new_state("A");
    let b = layer.new_state("B");
    let flags = layer.bool_parameters(&["L", "M"])?;
    let speeds = layer.float_parameters(&["V", "W"])?;

    a.transitions_to(&b)
        .when(flags.are_true())
        .and(speeds.are_greater_than(0.25));

    let controller = author.controller();
    let siblings = state_edges(&controller, &a, &b);
    assert_eq!(siblings.len(), 1);
    let params: Vec<_> = siblings[0]
        .conditions
        .iter()
        .map(|c| c.parameter.as_str())
        .collect();
    assert_eq!(params, vec!["L", "M", "V", "W"]);
    Ok(())
}
