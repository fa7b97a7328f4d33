//! Artifact Search Demo
//!
//! Searches five artifact slots for the builds that maximize a damage
//! formula, with a four-piece set requirement, a crit rate floor and set
//! bonuses. The candidate pool is generated from a fixed seed.

use buildforge::prelude::*;
use buildforge::ModifierGraph;
use buildforge_test::RandomPoolSpec;

const SEED: u64 = 42;

fn main() -> buildforge::Result<()> {
    buildforge::console::init();

    let pool = RandomPoolSpec::new(SEED)
        .with_slots(5)
        .with_candidates_per_slot(14)
        .with_sets(&["gladiator", "shimenawa", "wanderer", "emblem"])
        .with_stats(&["atk", "atk_", "crit_rate", "crit_dmg", "er"])
        .with_max_value(30)
        .generate();

    let mut effects = SetEffects::new();
    effects.add_bonus("gladiator", 2, [("atk_", 18.0)].into_iter().collect());
    effects.add_bonus("shimenawa", 2, [("atk_", 18.0)].into_iter().collect());
    effects.add_bonus("wanderer", 2, [("crit_dmg", 20.0)].into_iter().collect());
    effects.add_bonus("emblem", 2, [("er", 20.0)].into_iter().collect());

    // Total attack grows with the attack percentage of the base attack.
    let character = InitialStats::new("hutao")
        .with_base(
            [("base_atk", 715.0), ("crit_rate", 5.0), ("crit_dmg", 50.0)]
                .into_iter()
                .collect(),
        )
        .with_modifiers(
            ModifierGraph::new()
                .with("atk", "base_atk", 1.0)
                .with("atk", "atk_base_bonus", 1.0)
                .with("atk_base_bonus", "atk_", 7.15),
        );

    let registry = FormulaRegistry::new().with(
        FormulaKey::new("hutao", "charged", "avg_dmg"),
        |stats| {
            let multiplier = 2.42 * (1.0 + stats.base.get("dmg_") / 100.0);
            Formula::new(
                vec!["atk".into(), "crit_rate".into(), "crit_dmg".into()],
                move |bag| {
                    let crit_rate = (bag.get("crit_rate") / 100.0).clamp(0.0, 1.0);
                    let crit_dmg = bag.get("crit_dmg") / 100.0;
                    bag.get("atk") * multiplier * (1.0 + crit_rate * crit_dmg)
                },
            )
        },
    );

    let request = OptimizeRequest::new(pool, character, Objective::formula("charged", "avg_dmg"))
        .with_set_filter(SetFilter::new("gladiator", 2))
        .with_min("crit_rate", 20.0)
        .with_set_effects(effects)
        .with_max_results(5);

    let config = OptimizerConfig::load("optimizer.toml").unwrap_or_default();
    let manager = OptimizerManager::new(BuildOptimizer::new(registry).with_config(config));
    let mut handle = manager.start(request)?;

    let mut outcome = None;
    while let Some(message) = handle.blocking_recv() {
        match message {
            OptimizerMessage::Progress(update) => {
                println!(
                    "  progress: {} combinations in {}ms",
                    update.processed,
                    update.elapsed_ms()
                );
            }
            OptimizerMessage::Finished(result) => outcome = Some(result),
            OptimizerMessage::Failed { reason } => {
                eprintln!("optimization failed: {reason}");
                return Ok(());
            }
        }
    }

    let Some(outcome) = outcome else {
        eprintln!("optimizer ended without a result");
        return Ok(());
    };

    println!();
    println!(
        "Searched {} of {} combinations ({} pruning)",
        outcome.stats.searched_combinations, outcome.stats.total_combinations, outcome.stats.prune_tier
    );
    for (rank, build) in outcome.builds.iter().enumerate() {
        println!("#{} {:>10.1}  {}", rank + 1, build.value, build.piece_ids().join(", "));
    }
    Ok(())
}
