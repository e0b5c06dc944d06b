use super::*;
use crate::analyzer::page::{classify, PageParse};
use crate::analyzer::parsers::{accessory::*, armor::*, shield::*, weapon::*};
use crate::analyzer::Parser;
use crate::model::{
    Accessory, Armor, DamageType, Distance, Handed, Shield, Stat, Weapon, WeaponCategory,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use strum::IntoEnumIterator;

fn weapon_tokens(weapon: &Weapon, description: &Paragraph) -> Vec<Token> {
    let mut tokens = vec![image(), plain(&weapon.name)];
    if weapon.martial {
        tokens.push(glyph("E", "FnT_BasicShapes1"));
    }
    tokens.push(cost(weapon.cost));
    tokens.extend(accuracy(&weapon.accuracy));
    tokens.extend(damage(weapon.damage));
    tokens.push(plain(weapon.damage_type.as_ref()));
    tokens.push(plain(match weapon.hands {
        Handed::OneHanded => "One-handed",
        Handed::TwoHanded => "Two-handed",
    }));
    tokens.push(sep());
    tokens.push(plain(match weapon.melee {
        Distance::Melee => "Melee",
        Distance::Ranged => "Ranged",
    }));
    tokens.push(sep());
    tokens.extend(description.tokens());
    tokens
}

fn weapon_strategy(
    category: WeaponCategory,
) -> impl Strategy<Value = (Weapon, Paragraph)> {
    (
        (word(), any::<bool>(), 0i64..2000, accuracy_strategy(), 0i64..20),
        (
            prop::sample::select(DamageType::iter().collect::<Vec<_>>()),
            prop::sample::select(vec![Handed::OneHanded, Handed::TwoHanded]),
            prop::sample::select(vec![Distance::Melee, Distance::Ranged]),
            paragraph(),
        ),
    )
        .prop_map(
            move |((name, martial, cost, accuracy, damage), (damage_type, hands, melee, description))| {
                let weapon = Weapon {
                    image: image_token(),
                    name,
                    martial,
                    cost,
                    accuracy,
                    damage,
                    damage_type,
                    hands,
                    melee,
                    category,
                    description: description.text(),
                };
                (weapon, description)
            },
        )
}

fn category_strategy() -> impl Strategy<Value = WeaponCategory> {
    prop::sample::select(WeaponCategory::iter().collect::<Vec<_>>())
}

fn section_strategy() -> impl Strategy<Value = (WeaponCategory, Vec<(Weapon, Paragraph)>)> {
    category_strategy().prop_flat_map(|category| {
        (
            Just(category),
            prop::collection::vec(weapon_strategy(category), 1..3),
        )
    })
}

fn title(category: WeaponCategory) -> String {
    let word = category.to_string();
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => word,
    }
}

#[test]
fn test_basic_weapon_page_with_single_longsword() {
    let mut tokens = vec![image(), image(), plain("BASIC WEAPONS")];
    tokens.push(plain("Sword Category"));
    tokens.extend(vec![
        image(),
        body("Longsword"),
        body("100 z"),
        plain("【"),
        plain("DEX + MIG"),
        plain("】"),
        plain("【"),
        plain("HR + 5"),
        plain("】"),
        plain("physical"),
        plain("One-handed"),
        sep(),
        plain("Melee"),
        sep(),
        body("A simple blade."),
    ]);
    tokens.push(watermark());

    let weapons = match classify(parse_basic_weapons_page().parse(&tokens, 0)) {
        PageParse::Success(weapons) => weapons,
        other => panic!("unexpected verdict {other:?}"),
    };
    assert_eq!(weapons.len(), 1);
    let longsword = &weapons[0];
    assert_eq!(longsword.name, "Longsword");
    assert_eq!(longsword.cost, 100);
    assert!(!longsword.martial);
    assert_eq!(longsword.hands.to_string(), "one-handed");
    assert_eq!(longsword.melee.to_string(), "melee");
    assert_eq!(longsword.category, WeaponCategory::Sword);
    assert_eq!(longsword.accuracy.primary, Stat::Dex);
    assert_eq!(longsword.accuracy.bonus, 0);
    assert_eq!(longsword.damage, 5);
    assert_eq!(longsword.description, "A simple blade.");
}

#[test]
fn test_unknown_weapon_category_fails_the_page() {
    let tokens = vec![
        image(),
        image(),
        plain("BASIC WEAPONS"),
        plain("Banana Category"),
        image(),
        body("Peel"),
        body("5 z"),
        plain("【"),
        plain("DEX + MIG"),
        plain("】"),
        plain("【"),
        plain("HR + 1"),
        plain("】"),
        plain("physical"),
        plain("One-handed"),
        sep(),
        plain("Melee"),
        sep(),
        body("Slippery."),
        watermark(),
    ];

    match classify(parse_basic_weapons_page().parse(&tokens, 0)) {
        PageParse::Failure(failures) => {
            assert!(failures
                .iter()
                .any(|f| f.error.contains("Unexpected category banana")));
        }
        other => panic!("unexpected verdict {other:?}"),
    }
}

#[test]
fn test_rare_weapon_banner_sets_category() {
    let mut tokens = vec![
        image(),
        image(),
        plain("RARE WEAPONS"),
        plain("SAMPLE RARE SPEAR WEAPONS"),
        plain("Spears forged by legends."),
    ];
    tokens.extend(vec![
        image(),
        body("Skypiercer"),
        glyph("E", "FnT_BasicShapes1"),
        body("1500 z"),
        plain("【"),
        plain("DEX + MIG"),
        plain("】"),
        plain("+1"),
        plain("【"),
        plain("HR + 12"),
        plain("】"),
        plain("air"),
        plain("Two-handed"),
        sep(),
        plain("Melee"),
        sep(),
        body("Deals air damage."),
    ]);
    tokens.push(plain("273"));

    let weapons = match classify(parse_rare_weapons_page().parse(&tokens, 0)) {
        PageParse::Success(weapons) => weapons,
        other => panic!("unexpected verdict {other:?}"),
    };
    assert_eq!(weapons.len(), 1);
    assert_eq!(weapons[0].category, WeaponCategory::Spear);
    assert!(weapons[0].martial);
    assert_eq!(weapons[0].accuracy.bonus, 1);
    assert_eq!(weapons[0].damage_type, DamageType::Air);
    assert_eq!(weapons[0].hands, Handed::TwoHanded);
}

#[test]
fn test_bad_cost_on_second_accessory_is_the_furthest_failure() {
    let mut tokens = starting();
    tokens.extend(vec![image(), body("Ring"), cost(100), body("Shiny.")]);
    tokens.extend(vec![image(), body("Amulet"), body("abc z"), body("Shiny.")]);
    tokens.push(watermark());

    match classify(parse_accessory_page().parse(&tokens, 0)) {
        PageParse::Failure(failures) => {
            assert_eq!(failures[0].distance, 9);
            assert_eq!(failures[0].found, "abc z");
            assert!(failures[0].error.contains("Unexpected cost abc z"));
        }
        other => panic!("unexpected verdict {other:?}"),
    }
}

fn armor_strategy() -> impl Strategy<Value = (Armor, Vec<Token>)> {
    (
        (word(), any::<bool>(), 0i64..1000),
        (0i64..3, 0i64..3, -2i64..=0, paragraph()),
    )
        .prop_map(|((name, martial, price), (def, mdef, init, description))| {
            let defense = |attribute: &str, bonus: i64| {
                if bonus == 0 {
                    format!("{attribute} size")
                } else {
                    format!("{attribute} size +{bonus}")
                }
            };
            let mut tokens = vec![image(), plain(&name)];
            if martial {
                tokens.push(glyph("E", "FnT_BasicShapes1"));
            }
            tokens.push(cost(price));
            tokens.push(plain(&defense("DEX", def)));
            tokens.push(plain(&defense("INS", mdef)));
            tokens.push(plain(&if init == 0 {
                "-".to_string()
            } else {
                init.to_string()
            }));
            tokens.extend(description.tokens());
            let armor = Armor {
                image: image_token(),
                name,
                martial,
                cost: price,
                def,
                mdef,
                init,
                description: description.text(),
            };
            (armor, tokens)
        })
}

fn shield_strategy() -> impl Strategy<Value = (Shield, Vec<Token>)> {
    (
        (word(), any::<bool>(), 0i64..1000),
        (0i64..4, 0i64..4, -2i64..=0, paragraph()),
    )
        .prop_map(|((name, martial, price), (def, mdef, init, description))| {
            let signed = |value: i64| {
                if value == 0 {
                    "-".to_string()
                } else if value > 0 {
                    format!("+{value}")
                } else {
                    value.to_string()
                }
            };
            let mut tokens = vec![image(), plain(&name)];
            if martial {
                tokens.push(glyph("E", "FnT_BasicShapes1"));
            }
            tokens.push(cost(price));
            tokens.push(plain(&signed(def)));
            tokens.push(plain(&signed(mdef)));
            tokens.push(plain(&signed(init)));
            tokens.extend(description.tokens());
            let shield = Shield {
                image: image_token(),
                name,
                martial,
                cost: price,
                def,
                mdef,
                init,
                description: description.text(),
            };
            (shield, tokens)
        })
}

fn accessory_strategy() -> impl Strategy<Value = (Accessory, Vec<Token>)> {
    (word(), 0i64..5000, paragraph()).prop_map(|(name, price, description)| {
        let mut tokens = vec![image(), plain(&name), cost(price)];
        tokens.extend(description.tokens());
        let accessory = Accessory {
            image: image_token(),
            name,
            cost: price,
            description: description.text(),
        };
        (accessory, tokens)
    })
}

proptest! {
    #[test]
    fn test_basic_weapons_page_round_trip(
        sections in prop::collection::vec(section_strategy(), 1..3)
    ) {
        let mut tokens = vec![image(), image(), plain("WEAPONS")];
        let mut expected = Vec::new();
        for (category, weapons) in &sections {
            tokens.push(plain(&format!("{} Category", title(*category))));
            for (weapon, description) in weapons {
                tokens.extend(weapon_tokens(weapon, description));
                expected.push(weapon.clone());
            }
        }
        tokens.push(plain("BASIC WEAPONS"));
        tokens.push(plain("132"));

        prop_assert_eq!(
            classify(parse_basic_weapons_page().parse(&tokens, 0)),
            PageParse::Success(expected)
        );
    }

    #[test]
    fn test_rare_weapons_page_round_trip(
        (category, weapons) in section_strategy()
    ) {
        let mut tokens = vec![
            image(),
            image(),
            plain("RARE WEAPONS"),
            plain(&format!("SAMPLE RARE {} WEAPONS", category.to_string().to_uppercase())),
            plain("Legendary arms."),
        ];
        for (weapon, description) in &weapons {
            tokens.extend(weapon_tokens(weapon, description));
        }
        tokens.push(plain("274"));
        let expected: Vec<Weapon> = weapons.into_iter().map(|(weapon, _)| weapon).collect();

        prop_assert_eq!(
            classify(parse_rare_weapons_page().parse(&tokens, 0)),
            PageParse::Success(expected)
        );
    }

    #[test]
    fn test_armor_page_round_trip(
        armors in prop::collection::vec(armor_strategy(), 1..4),
        trailing_image in any::<bool>()
    ) {
        let mut tokens = starting();
        let mut expected = Vec::new();
        for (armor, rendered) in armors {
            tokens.extend(rendered);
            expected.push(armor);
        }
        if trailing_image {
            tokens.push(image());
        }
        tokens.push(watermark());

        prop_assert_eq!(
            classify(parse_armor_page().parse(&tokens, 0)),
            PageParse::Success(expected)
        );
    }

    #[test]
    fn test_shield_page_round_trip(
        shields in prop::collection::vec(shield_strategy(), 1..4),
        caption in any::<bool>()
    ) {
        let mut tokens = starting();
        let mut expected = Vec::new();
        for (shield, rendered) in shields {
            tokens.extend(rendered);
            expected.push(shield);
        }
        if caption {
            tokens.extend(vec![plain("Shields"), plain("of the realm"), image()]);
        }
        tokens.push(watermark());

        prop_assert_eq!(
            classify(parse_shield_page().parse(&tokens, 0)),
            PageParse::Success(expected)
        );
    }

    #[test]
    fn test_accessory_page_round_trip(
        accessories in prop::collection::vec(accessory_strategy(), 1..4)
    ) {
        let mut tokens = starting();
        let mut expected = Vec::new();
        for (accessory, rendered) in accessories {
            tokens.extend(rendered);
            expected.push(accessory);
        }
        tokens.push(watermark());

        prop_assert_eq!(
            classify(parse_accessory_page().parse(&tokens, 0)),
            PageParse::Success(expected)
        );
    }
}
