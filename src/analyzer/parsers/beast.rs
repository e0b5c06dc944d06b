//! Bestiary pages.
//!
//! A bestiary entry is the densest layout in the rulebook: a stat block,
//! a resistance row printed as damage-type glyphs, and up to four optional
//! sections (basic attacks, spells, other actions, special rules). Each
//! optional part is parsed as `alt(part, zero(default))`, so a page is only
//! accepted when exactly one combination of present parts covers it.

use super::{super::{core::*, prelude::*}, common::*};
use crate::model::{
    Accuracy, Affinity, Beast, BeastAttack, BeastAttributes, BeastRule, BeastSpell, DamageType,
    DieSize, Distance, ResistanceMap,
};
use crate::token::{fonts, Token};
use lazy_static::lazy_static;
use regex::Regex;
use strum::IntoEnumIterator;

lazy_static! {
    static ref LEVEL: Regex = Regex::new(r"^Lv ([0-9]+)$").unwrap();
    static ref NUMBER: Regex = Regex::new(r"^[0-9]+$").unwrap();
    static ref INIT: Regex = Regex::new(r"^Init\. ([0-9]+)$").unwrap();
    static ref DEF: Regex = Regex::new(r"^DEF \+?([0-9]+)$").unwrap();
    static ref MDEF: Regex = Regex::new(r"^M\.DEF \+?([0-9]+)$").unwrap();
    static ref ASIDE_LINE: Regex = Regex::new(r"^.*[^.]$").unwrap();
    static ref ASIDE_END: Regex = Regex::new(r"^.*\.$").unwrap();
}

/// Matches `regex` and reads its first capture group as a number.
fn parse_captured_number(regex: &'static Regex, label: &str) -> impl Parser<Token, i64> {
    satisfy(
        move |token: &Token| {
            let captures = regex.captures(&token.as_text()?.text)?;
            captures.get(1)?.as_str().parse::<i64>().ok()
        },
        label,
    )
}

fn parse_number(label: &str) -> impl Parser<Token, i64> {
    parse_number_matching(&NUMBER, label)
}

/// `DEX d8`
fn parse_die(stat: &'static str) -> impl Parser<Token, DieSize> {
    satisfy(
        move |token: &Token| {
            let size = token.as_text()?.text.strip_prefix(stat)?.strip_prefix(" d")?;
            DieSize::try_from(size.parse::<i64>().ok()?).ok()
        },
        stat,
    )
}

fn parse_attributes() -> impl Parser<Token, BeastAttributes> {
    with_context(
        map(
            tuple2(
                tuple4(
                    parse_die("DEX"),
                    parse_die("INS"),
                    parse_die("MIG"),
                    parse_die("WLP"),
                ),
                tuple6(
                    preceded(parse_exact("HP"), parse_number("HP")),
                    preceded(parse_sep(), parse_number("Crisis")),
                    preceded(parse_exact("MP"), parse_number("MP")),
                    parse_captured_number(&INIT, "beast init"),
                    parse_captured_number(&DEF, "beast def"),
                    parse_captured_number(&MDEF, "beast mdef"),
                ),
            ),
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
        ),
        "attributes",
    )
}

fn parse_affinity() -> impl Parser<Token, Affinity> {
    satisfy(
        |token: &Token| token.as_text()?.text.parse::<Affinity>().ok(),
        "affinity",
    )
}

/// One damage type glyph: alone when unmarked, doubled and followed by the
/// affinity otherwise.
fn parse_resistance(code: &'static str) -> impl Parser<Token, Affinity> {
    alt(
        map(parse_exact(code), |_| Affinity::Normal),
        preceded(tuple2(parse_exact(code), parse_exact(code)), parse_affinity()),
    )
}

/// Folds the resistance row over every damage type in rulebook order.
///
/// Air/dark and bolt/poison print the same glyph; the fixed order tells
/// them apart.
struct Resistances;

impl Parser<Token, ResistanceMap> for Resistances {
    fn parse(&self, input: &[Token], pos: usize) -> ParseResult<ResistanceMap> {
        let mut branches: ParseResult<ResistanceMap> = vec![Ok((pos, ResistanceMap::default()))];
        for damage_type in DamageType::iter() {
            let resistance =
                with_context(parse_resistance(damage_type.code()), damage_type.to_string());
            branches = continue_with(
                branches,
                |next| resistance.parse(input, next),
                |resists, affinity| resists.with(damage_type, affinity),
            );
        }
        branches
    }
}

/// `Equipment:` `bronze sword, leather armor.`
fn parse_equipment() -> impl Parser<Token, Option<Vec<String>>> {
    alt(
        map(
            preceded(parse_exact("Equipment:"), parse_text()),
            |list: String| {
                let list = list.strip_suffix('.').unwrap_or(&list);
                Some(list.split(", ").map(str::to_string).collect::<Vec<_>>())
            },
        ),
        zero(None),
    )
}

fn parse_bold_damage_type() -> impl Parser<Token, DamageType> {
    satisfy(
        |token: &Token| {
            let text = token.as_text().filter(|t| t.font_ends_with(fonts::BODY_BOLD))?;
            text.text.parse::<DamageType>().ok()
        },
        "damage type",
    )
}

fn parse_attack_damage() -> impl Parser<Token, (i64, Option<DamageType>)> {
    alt(
        tuple2(
            parse_damage(),
            alt(map(parse_bold_damage_type(), Some), zero(None)),
        ),
        zero((0, None)),
    )
}

fn parse_attack() -> impl Parser<Token, BeastAttack> {
    with_context(
        map(
            tuple5(
                alt(
                    map(parse_exact_with_font("$", fonts::EVILZ), |_| Distance::Melee),
                    map(many1(parse_exact_with_font("a", fonts::FABULA)), |_| {
                        Distance::Ranged
                    }),
                ),
                parse_text(),
                preceded(parse_sep(), parse_accuracy()),
                preceded(parse_sep(), parse_attack_damage()),
                parse_description(),
            ),
            |(range, name, accuracy, (damage, damage_type), description)| BeastAttack {
                range,
                name,
                accuracy,
                damage,
                damage_type,
                description,
            },
        ),
        "basic attack",
    )
}

/// Drops the ` MP` unit.
fn parse_mp_cost() -> impl Parser<Token, String> {
    and_then(parse_text(), |s: String| {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() < 3 {
            return Err(format!("Unexpected MP cost {s}"));
        }
        Ok(chars[..chars.len() - 3].iter().collect::<String>())
    })
}

/// The duration ends the spell header with a period, printed either inside
/// the duration token or as a token of its own.
fn parse_duration() -> impl Parser<Token, String> {
    alt(
        map(
            parse_text_where("duration", |t| t.text.len() > 1 && t.text.ends_with('.')),
            |s: String| s.trim_end_matches('.').to_string(),
        ),
        terminated(
            parse_text_where("duration", |t| !t.text.ends_with('.')),
            parse_exact("."),
        ),
    )
}

fn parse_spell_accuracy() -> impl Parser<Token, Option<Accuracy>> {
    alt(
        map(
            preceded(
                many1(parse_exact_with_font("r", fonts::ICONS)),
                preceded(parse_sep(), parse_accuracy()),
            ),
            Some,
        ),
        zero(None),
    )
}

fn parse_opportunity() -> impl Parser<Token, Option<String>> {
    alt(
        map(preceded(parse_exact("Opportunity:"), parse_description()), Some),
        zero(None),
    )
}

fn parse_spell() -> impl Parser<Token, BeastSpell> {
    with_context(
        map(
            tuple2(
                tuple4(
                    preceded(parse_exact_with_font("h", fonts::EVILZ), parse_text()),
                    parse_spell_accuracy(),
                    preceded(parse_sep(), parse_mp_cost()),
                    preceded(parse_sep(), parse_text()),
                ),
                tuple3(
                    preceded(parse_sep(), parse_duration()),
                    parse_description(),
                    parse_opportunity(),
                ),
            ),
            |((name, accuracy, mp, target), (duration, description, opportunity))| BeastSpell {
                name,
                accuracy,
                mp,
                target,
                duration,
                description,
                opportunity,
            },
        ),
        "spell",
    )
}

fn parse_rule() -> impl Parser<Token, BeastRule> {
    map(
        tuple2(terminated(parse_text(), parse_sep()), parse_description()),
        |(name, description)| BeastRule { name, description },
    )
}

/// An optional section introduced by a literal header.
fn parse_section<P, O>(header: &'static str, item: P) -> impl Parser<Token, Vec<O>>
where
    P: Parser<Token, O> + 'static,
    O: Clone + 'static,
{
    alt(
        with_context(preceded(parse_exact(header), many1(item)), header),
        zero(Vec::new()),
    )
}

fn parse_beast() -> impl Parser<Token, Beast> {
    with_context(
        map(
            tuple2(
                tuple6(
                    parse_image(),
                    parse_text(),
                    parse_captured_number(&LEVEL, "level"),
                    preceded(parse_sep(), parse_text()),
                    parse_description(),
                    preceded(parse_exact("Typical Traits:"), parse_text()),
                ),
                tuple6(
                    parse_attributes(),
                    Resistances,
                    parse_equipment(),
                    parse_section("BASIC ATTACKS", parse_attack()),
                    parse_section("SPELLS", parse_spell()),
                    tuple2(
                        parse_section(
                            "OTHER ACTIONS",
                            preceded(parse_exact_with_font("S", fonts::WEB_SYMBOLS), parse_rule()),
                        ),
                        parse_section("SPECIAL RULES", parse_rule()),
                    ),
                ),
            ),
            |(
                (image, name, level, beast_type, description, traits),
                (attributes, resists, equipment, attacks, spells, (other_actions, special_rules)),
            )| Beast {
                image,
                name,
                level,
                beast_type,
                description,
                traits,
                attributes,
                resists,
                equipment,
                attacks,
                spells,
                other_actions,
                special_rules,
            },
        ),
        "beast",
    )
}

/// Illustrated sidebars and credits printed after the last entry.
fn parse_aside() -> impl Parser<Token, ()> {
    choice(vec![
        Box::new(map(
            tuple3(
                parse_text_with_font(&[fonts::CORSIVA]),
                parse_text_with_font(&[fonts::CORSIVA]),
                alt(
                    map(
                        tuple5(
                            many1(parse_text_where("aside", |t| {
                                !t.font_ends_with(fonts::ANTONIO_BOLD)
                            })),
                            parse_text_with_font(&[fonts::ANTONIO_BOLD]),
                            parse_image(),
                            many(parse_text()),
                            parse_image(),
                        ),
                        |_| (),
                    ),
                    zero(()),
                ),
            ),
            |_| (),
        )),
        Box::new(map(
            tuple6(
                many1(parse_matching(&ASIDE_LINE, "aside")),
                parse_matching(&ASIDE_END, "aside"),
                parse_text_with_font(&[fonts::ANTONIO_BOLD]),
                parse_image(),
                many(parse_text()),
                parse_image(),
            ),
            |_| (),
        )),
        Box::new(map(parse_text_with_font(&[fonts::CREDIT_VALLEY]), |_| ())),
        Box::new(zero(())),
    ])
}

pub fn parse_bestiary_page() -> impl Parser<Token, Vec<Beast>> {
    with_context(
        map(
            tuple5(
                parse_starting(),
                many1(parse_beast()),
                parse_aside(),
                parse_watermark(),
                eof(),
            ),
            |(_, beasts, _, _, _)| beasts,
        ),
        "bestiary page",
    )
}
