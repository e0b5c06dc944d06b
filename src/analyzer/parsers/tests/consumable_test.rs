use super::*;
use crate::analyzer::page::{classify, PageParse};
use crate::analyzer::parsers::consumable::*;
use crate::analyzer::Parser;
use crate::model::{Consumable, ConsumableGroup};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn consumable_strategy() -> impl Strategy<Value = (Consumable, Vec<Token>)> {
    (prop::collection::vec(word(), 1..3), 1i64..50, paragraph()).prop_map(
        |(name, ip_cost, description)| {
            let mut tokens = vec![image()];
            tokens.extend(name.iter().map(|w| plain(w)));
            tokens.push(plain(&ip_cost.to_string()));
            tokens.extend(description.tokens());
            let consumable = Consumable {
                image: image_token(),
                name: name.join(" "),
                ip_cost,
                description: description.text(),
            };
            (consumable, tokens)
        },
    )
}

fn group_strategy() -> impl Strategy<Value = (String, Vec<(Consumable, Vec<Token>)>)> {
    (
        "[A-Z][a-z]{2,8}",
        prop::collection::vec(consumable_strategy(), 1..3),
    )
}

#[test]
fn test_consumables_page_with_two_groups() {
    let tokens = vec![
        image(),
        image(),
        plain("CONSUMABLES"),
        plain("Potions"),
        image(),
        plain("Elixir"),
        plain("3"),
        body("Recovers 50 Mind Points."),
        image(),
        plain("Remedy"),
        plain("3"),
        body("Recovers from all"),
        body("status effects."),
        plain("Utility"),
        image(),
        plain("Magic"),
        plain("Tent"),
        plain("4"),
        body("Rest anywhere."),
        plain("106"),
        watermark(),
    ];

    let groups = match classify(parse_consumables_page().parse(&tokens, 0)) {
        PageParse::Success(groups) => groups,
        other => panic!("unexpected verdict {other:?}"),
    };
    let summary: Vec<(String, Vec<String>)> = groups
        .iter()
        .map(|g| {
            (
                g.category.clone(),
                g.items.iter().map(|i| i.name.clone()).collect(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            (
                "Potions".to_string(),
                vec!["Elixir".to_string(), "Remedy".to_string()]
            ),
            ("Utility".to_string(), vec!["Magic Tent".to_string()]),
        ]
    );
    assert_eq!(groups[0].items[1].description, "Recovers from all status effects.");
    assert_eq!(groups[1].items[0].ip_cost, 4);
}

proptest! {
    #[test]
    fn test_consumables_page_round_trip(
        groups in prop::collection::vec(group_strategy(), 1..3)
    ) {
        let mut tokens = vec![image(), image(), plain("CONSUMABLES")];
        let mut expected = Vec::new();
        for (category, items) in groups {
            tokens.push(plain(&category));
            let mut consumables = Vec::new();
            for (consumable, rendered) in items {
                tokens.extend(rendered);
                consumables.push(consumable);
            }
            expected.push(ConsumableGroup { category, items: consumables });
        }
        tokens.push(plain("106"));
        tokens.push(watermark());

        prop_assert_eq!(
            classify(parse_consumables_page().parse(&tokens, 0)),
            PageParse::Success(expected)
        );
    }
}
