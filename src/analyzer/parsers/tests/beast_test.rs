use super::*;
use crate::analyzer::page::{classify, PageParse};
use crate::analyzer::parsers::{beast::*, common::*};
use crate::analyzer::prelude::*;
use crate::analyzer::Parser;
use crate::model::{
    Affinity, Beast, BeastAttack, BeastAttributes, BeastRule, BeastSpell, DamageType, DieSize,
    Distance, ResistanceMap,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use strum::{EnumCount, IntoEnumIterator};

fn resistance_tokens(resists: &ResistanceMap) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (damage_type, affinity) in resists.iter() {
        let code = damage_type.code();
        if affinity == Affinity::Normal {
            tokens.push(plain(code));
        } else {
            tokens.extend(vec![plain(code), plain(code), plain(affinity.as_ref())]);
        }
    }
    tokens
}

fn attributes_tokens(attributes: &BeastAttributes) -> Vec<Token> {
    vec![
        plain(&format!("DEX d{}", attributes.dex.value())),
        plain(&format!("INS d{}", attributes.ins.value())),
        plain(&format!("MIG d{}", attributes.mig.value())),
        plain(&format!("WLP d{}", attributes.wlp.value())),
        plain("HP"),
        plain(&attributes.max_hp.to_string()),
        sep(),
        plain(&attributes.crisis.to_string()),
        plain("MP"),
        plain(&attributes.max_mp.to_string()),
        plain(&format!("Init. {}", attributes.init)),
        plain(&format!("DEF +{}", attributes.def)),
        plain(&format!("M.DEF +{}", attributes.mdef)),
    ]
}

fn die() -> impl Strategy<Value = DieSize> {
    prop::sample::select(DieSize::iter().collect::<Vec<_>>())
}

fn attributes_strategy() -> impl Strategy<Value = BeastAttributes> {
    (
        (die(), die(), die(), die()),
        (10i64..200, 5i64..100, 5i64..80, 5i64..20, 0i64..4, 0i64..4),
    )
        .prop_map(
            |((dex, ins, mig, wlp), (max_hp, crisis, max_mp, init, def, mdef))| BeastAttributes {
                dex,
                ins,
                mig,
                wlp,
                max_hp,
                crisis,
                max_mp,
                init,
                def,
                mdef,
            },
        )
}

fn resistances_strategy() -> impl Strategy<Value = ResistanceMap> {
    prop::collection::vec(
        prop::sample::select(Affinity::iter().collect::<Vec<_>>()),
        DamageType::COUNT,
    )
    .prop_map(|affinities| {
        DamageType::iter()
            .zip(affinities)
            .fold(ResistanceMap::default(), |map, (damage_type, affinity)| {
                map.with(damage_type, affinity)
            })
    })
}

fn attack_strategy() -> impl Strategy<Value = (BeastAttack, Vec<Token>)> {
    (
        any::<bool>(),
        word(),
        accuracy_strategy(),
        prop::option::of((
            0i64..20,
            prop::option::of(prop::sample::select(DamageType::iter().collect::<Vec<_>>())),
        )),
        paragraph(),
    )
        .prop_map(|(melee, name, accuracy, hit, description)| {
            let mut tokens = if melee {
                vec![glyph("$", "Evilz")]
            } else {
                vec![glyph("a", "fabulaultima")]
            };
            tokens.push(plain(&name));
            tokens.push(sep());
            tokens.extend(super::accuracy(&accuracy));
            tokens.push(sep());
            let (damage, damage_type) = hit.unwrap_or((0, None));
            if hit.is_some() {
                tokens.extend(super::damage(damage));
                if let Some(damage_type) = damage_type {
                    tokens.push(glyph(damage_type.as_ref(), "PTSans-NarrowBold"));
                }
            }
            tokens.extend(description.tokens());
            let attack = BeastAttack {
                range: if melee {
                    Distance::Melee
                } else {
                    Distance::Ranged
                },
                name,
                accuracy,
                damage,
                damage_type,
                description: description.text(),
            };
            (attack, tokens)
        })
}

fn spell_strategy() -> impl Strategy<Value = (BeastSpell, Vec<Token>)> {
    (
        (
            word(),
            prop::option::of(accuracy_strategy()),
            1i64..30,
            word(),
        ),
        (word(), paragraph(), prop::option::of(paragraph())),
    )
        .prop_map(
            |((name, accuracy, mp, target), (duration, description, opportunity))| {
                let mut tokens = vec![glyph("h", "Evilz"), plain(&name)];
                if let Some(accuracy) = &accuracy {
                    tokens.push(glyph("r", "Heydings-Icons"));
                    tokens.push(sep());
                    tokens.extend(super::accuracy(accuracy));
                }
                tokens.extend(vec![
                    sep(),
                    plain(&format!("{mp} MP")),
                    sep(),
                    plain(&target),
                    sep(),
                    plain(&duration),
                    plain("."),
                ]);
                tokens.extend(description.tokens());
                if let Some(opportunity) = &opportunity {
                    tokens.push(plain("Opportunity:"));
                    tokens.extend(opportunity.tokens());
                }
                let spell = BeastSpell {
                    name,
                    accuracy,
                    mp: mp.to_string(),
                    target,
                    duration,
                    description: description.text(),
                    opportunity: opportunity.map(|p| p.text()),
                };
                (spell, tokens)
            },
        )
}

fn rule_strategy() -> impl Strategy<Value = (BeastRule, Vec<Token>)> {
    (word(), paragraph()).prop_map(|(name, description)| {
        let mut tokens = vec![plain(&name), sep()];
        tokens.extend(description.tokens());
        (
            BeastRule {
                name,
                description: description.text(),
            },
            tokens,
        )
    })
}

fn section<T>(
    header: &str,
    entries: Vec<(T, Vec<Token>)>,
    marker: Option<Token>,
    tokens: &mut Vec<Token>,
) -> Vec<T> {
    if entries.is_empty() {
        return Vec::new();
    }
    tokens.push(plain(header));
    entries
        .into_iter()
        .map(|(entry, rendered)| {
            tokens.extend(marker.clone());
            tokens.extend(rendered);
            entry
        })
        .collect()
}

fn beast_strategy() -> impl Strategy<Value = (Beast, Vec<Token>)> {
    (
        (word(), 1i64..60, word(), paragraph(), word()),
        (
            attributes_strategy(),
            resistances_strategy(),
            prop::option::of(prop::collection::vec(word(), 1..3)),
        ),
        (
            prop::collection::vec(attack_strategy(), 0..3),
            prop::collection::vec(spell_strategy(), 0..3),
            prop::collection::vec(rule_strategy(), 0..2),
            prop::collection::vec(rule_strategy(), 0..2),
        ),
    )
        .prop_map(
            |(
                (name, level, beast_type, description, traits),
                (attributes, resists, equipment),
                (attacks, spells, other_actions, special_rules),
            )| {
                let mut tokens = vec![
                    image(),
                    plain(&name),
                    plain(&format!("Lv {level}")),
                    sep(),
                    plain(&beast_type),
                ];
                tokens.extend(description.tokens());
                tokens.push(plain("Typical Traits:"));
                tokens.push(plain(&traits));
                tokens.extend(attributes_tokens(&attributes));
                tokens.extend(resistance_tokens(&resists));
                if let Some(equipment) = &equipment {
                    tokens.push(plain("Equipment:"));
                    tokens.push(plain(&format!("{}.", equipment.join(", "))));
                }
                let attacks = section("BASIC ATTACKS", attacks, None, &mut tokens);
                let spells = section("SPELLS", spells, None, &mut tokens);
                let other_actions = section(
                    "OTHER ACTIONS",
                    other_actions,
                    Some(glyph("S", "WebSymbols-Regular")),
                    &mut tokens,
                );
                let special_rules = section("SPECIAL RULES", special_rules, None, &mut tokens);
                let beast = Beast {
                    image: image_token(),
                    name,
                    level,
                    beast_type,
                    description: description.text(),
                    traits,
                    attributes,
                    resists,
                    equipment,
                    attacks,
                    spells,
                    other_actions,
                    special_rules,
                };
                (beast, tokens)
            },
        )
}

fn bestiary_page(
    beasts: Vec<(Beast, Vec<Token>)>,
    trailer: Vec<Token>,
) -> (Vec<Beast>, Vec<Token>) {
    let mut tokens = starting();
    let mut expected = Vec::new();
    for (beast, rendered) in beasts {
        tokens.extend(rendered);
        expected.push(beast);
    }
    tokens.extend(trailer);
    tokens.push(watermark());
    (expected, tokens)
}

/// A beast with a physical resistance, fire vulnerability and one attack.
fn goblin() -> Vec<Token> {
    let mut tokens = vec![
        image(),
        plain("Goblin"),
        plain("Lv 5"),
        sep(),
        plain("Demon"),
        body("A small and"),
        body("cunning demon."),
        plain("Typical Traits:"),
        plain("greedy, sneaky"),
        plain("DEX d10"),
        plain("INS d8"),
        plain("MIG d6"),
        plain("WLP d6"),
        plain("HP"),
        plain("50"),
        sep(),
        plain("25"),
        plain("MP"),
        plain("40"),
        plain("Init. 9"),
        plain("DEF +1"),
        plain("M.DEF +0"),
        plain("'"),
        plain("'"),
        plain("RS"),
    ];
    for code in ["a", "b", "a", "E"] {
        tokens.push(plain(code));
    }
    tokens.extend(vec![plain("f"), plain("f"), plain("VU")]);
    for code in ["i", "l", "b"] {
        tokens.push(plain(code));
    }
    tokens.extend(vec![
        plain("Equipment:"),
        plain("dagger, leather armor."),
        plain("BASIC ATTACKS"),
        glyph("$", "Evilz"),
        plain("Stab"),
        sep(),
        plain("【"),
        plain("DEX + INS"),
        plain("】"),
        sep(),
        plain("【"),
        plain("HR + 5"),
        plain("】"),
        glyph("dark", "PTSans-NarrowBold"),
        body("Quick strike."),
        plain("SPELLS"),
        glyph("h", "Evilz"),
        plain("Curse"),
        glyph("r", "Heydings-Icons"),
        sep(),
        plain("【"),
        plain("INS + WLP"),
        plain("】"),
        sep(),
        plain("10 MP"),
        sep(),
        plain("One creature"),
        sep(),
        plain("Instantaneous."),
        body("The target suffers"),
        body("dazed."),
        plain("Opportunity:"),
        body("Also weak."),
    ]);
    tokens
}

#[test]
fn test_bestiary_page_reads_goblin() {
    let mut tokens = starting();
    tokens.extend(goblin());
    tokens.push(watermark());

    let beasts = match classify(parse_bestiary_page().parse(&tokens, 0)) {
        PageParse::Success(beasts) => beasts,
        other => panic!("unexpected verdict {other:?}"),
    };
    assert_eq!(beasts.len(), 1);
    let goblin = &beasts[0];
    assert_eq!(goblin.name, "Goblin");
    assert_eq!(goblin.level, 5);
    assert_eq!(goblin.beast_type, "Demon");
    assert_eq!(goblin.description, "A small and cunning demon.");
    assert_eq!(goblin.attributes.dex, DieSize::D10);
    assert_eq!(goblin.attributes.max_hp, 50);
    assert_eq!(goblin.attributes.init, 9);
    assert_eq!(
        goblin.equipment,
        Some(vec!["dagger".to_string(), "leather armor".to_string()])
    );
    assert_eq!(goblin.attacks[0].damage_type, Some(DamageType::Dark));
    assert_eq!(goblin.attacks[0].range, Distance::Melee);

    let spell = &goblin.spells[0];
    assert_eq!(spell.mp, "10");
    assert_eq!(spell.duration, "Instantaneous");
    assert_eq!(spell.description, "The target suffers dazed.");
    assert_eq!(spell.opportunity.as_deref(), Some("Also weak."));
}

#[test]
fn test_resistances_cover_every_damage_type() {
    let mut tokens = starting();
    tokens.extend(goblin());
    tokens.push(watermark());

    let beasts = match classify(parse_bestiary_page().parse(&tokens, 0)) {
        PageParse::Success(beasts) => beasts,
        other => panic!("unexpected verdict {other:?}"),
    };
    let resists: Vec<(DamageType, Affinity)> = beasts[0].resists.iter().collect();
    assert_eq!(resists.len(), DamageType::COUNT);
    for (damage_type, affinity) in resists {
        let expected = match damage_type {
            DamageType::Physical => Affinity::Resistant,
            DamageType::Fire => Affinity::Vulnerable,
            _ => Affinity::Normal,
        };
        assert_eq!(affinity, expected, "{damage_type}");
    }
}

#[test]
fn test_bestiary_page_skips_illustrated_aside() {
    let trailer = vec![
        glyph("Lore", "MonotypeCorsiva"),
        glyph("of the wild", "MonotypeCorsiva"),
        plain("Some beasts roam"),
        glyph("BEWARE", "Antonio-Bold"),
        image(),
        plain("caption"),
        image(),
    ];
    let mut tokens = starting();
    tokens.extend(goblin());
    tokens.extend(trailer);
    tokens.push(watermark());

    assert!(classify(parse_bestiary_page().parse(&tokens, 0)).is_success());
}

#[test]
fn test_bestiary_page_skips_credits() {
    let mut tokens = starting();
    tokens.extend(goblin());
    tokens.push(glyph("Illustration by someone", "CreditValley"));
    tokens.push(watermark());

    assert!(classify(parse_bestiary_page().parse(&tokens, 0)).is_success());
}

#[test]
fn test_truncated_beast_reports_furthest_failure() {
    let mut tokens = starting();
    let mut beast = goblin();
    beast.truncate(20);
    tokens.extend(beast);
    tokens.push(watermark());

    match classify(parse_bestiary_page().parse(&tokens, 0)) {
        PageParse::Failure(failures) => {
            assert!(!failures.is_empty());
            assert!(failures[0].distance >= 20);
            assert!(failures
                .windows(2)
                .all(|pair| pair[0].distance >= pair[1].distance));
        }
        other => panic!("unexpected verdict {other:?}"),
    }
}

#[test]
fn test_optional_list_that_may_also_be_empty_is_ambiguous() {
    let grammar = tuple3(
        alt(
            map(preceded(parse_exact("Equipment:"), parse_text()), Some),
            zero(None),
        ),
        many(parse_text()),
        eof(),
    );
    let tokens = vec![plain("Equipment:"), plain("sword.")];

    match classify(grammar.parse(&tokens, 0)) {
        PageParse::TooMany { count, .. } => assert_eq!(count, 2),
        other => panic!("unexpected verdict {other:?}"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_bestiary_page_round_trip(
        beasts in prop::collection::vec(beast_strategy(), 1..3)
    ) {
        let (expected, tokens) = bestiary_page(beasts, Vec::new());
        prop_assert_eq!(
            classify(parse_bestiary_page().parse(&tokens, 0)),
            PageParse::Success(expected)
        );
    }
}
