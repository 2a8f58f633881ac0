use crate::classes::ClassSheet;
use crate::traverse::PathRecord;

/// Legend colours for the abilities used across the story.
const PALETTE: &[(&str, &str)] = &[
    ("Stealth", "#071F2E"),
    ("Lockpicking", "#333236"),
    ("Perception", "#c7ecd7"),
    ("Engineering", "#717FFF"),
    ("Charisma", "#f5ea57"),
    ("Strength", "#ce0e00"),
    ("Dexterity", "#0400f5"),
    ("Intelligence", "#33c99c"),
    ("Medicine", "#14af00"),
    ("Willpower", "#bf71ff"),
    ("Constitution", "#470000"),
    ("Survival", "#3f7565"),
    ("Crafting", "#462E10"),
    ("Lumion", "#00b7ff"),
    ("Wisdom", "#5d0281"),
];

const FALLBACK_COLOR: &str = "#7f8c8d";

/// Pixels per ability point on path rows.
const PATH_BAR_SCALE: u64 = 10;
/// Pixels per ability point on class rows.
const CLASS_BAR_SCALE: u64 = 5;

const STYLE: &str = "\
body { font-family: Arial, sans-serif; background: #121212; color: #eee; padding: 20px; }
h1 { margin-bottom: 5px; }
h2 { margin: 15px 0 5px 0; }
.count { margin-bottom: 20px; font-weight: bold; }
.legend { margin-bottom: 20px; }
.legend div { display: inline-block; padding: 4px 10px; margin-right: 5px; border-radius: 4px; color: #fff; font-size: 12px; }
.bar-container { margin-bottom: 10px; background: #1e1e1e; border-radius: 10px; padding: 5px; position: relative; display: flex; align-items: center; justify-content: center; }
.zero-line { position: absolute; left: 50%; top: 0; bottom: 0; width: 2px; background: #1f7; z-index: 1; }
.negative-column, .positive-column { display: flex; align-items: center; width: 45%; }
.negative-column { justify-content: flex-end; }
.positive-column { justify-content: flex-start; }
.bar { height: 100%; border-radius: 4px; margin: 0 1px; display: flex; align-items: center; justify-content: center; font-size: 12px; color: #fff; position: relative; }
.bar:hover::after { content: attr(data-tooltip); position: absolute; top: -25px; left: 50%; transform: translateX(-50%); background: #333; color: #fff; font-size: 12px; padding: 2px 6px; border-radius: 4px; white-space: nowrap; z-index: 100; }
";

pub fn color_for(ability: &str) -> &'static str {
    PALETTE
        .iter()
        .find(|(name, _)| *name == ability)
        .map_or(FALLBACK_COLOR, |&(_, color)| color)
}

/// Render every record as one row of bars: negative totals grow left of the
/// zero line, positive totals right of it. Zero totals are not drawn.
pub fn render_html(records: &[PathRecord]) -> String {
    let mut html = page_header("All story paths");
    html.push_str("<h1>All story paths and abilities</h1>\n");
    html.push_str(&format!(
        "<div class=\"count\">Total paths: {}</div>\n",
        records.len()
    ));
    html.push_str(&legend());

    for record in records {
        html.push_str(&render_path_row(record));
    }

    html.push_str("</body></html>\n");
    html
}

/// Render one heading and bar row per class. Unlike path rows, zero values
/// are drawn on the positive side so every listed ability is visible.
pub fn render_class_html(classes: &[ClassSheet]) -> String {
    let mut html = page_header("Class abilities");
    html.push_str("<h1>Class abilities (negative left, positive right)</h1>\n");
    html.push_str(&legend());

    for class in classes {
        html.push_str(&format!(
            "<h2>{} (HP: {}, Defense: {})</h2>\n",
            escape(&class.name),
            class.hp,
            class.defense
        ));
        let mut negative = String::new();
        let mut positive = String::new();
        for (ability, &value) in &class.abilities {
            let tooltip = escape(&format!("{ability}: {value}"));
            let bar = bar(ability, value, CLASS_BAR_SCALE, &tooltip);
            if value < 0 {
                negative.push_str(&bar);
            } else {
                positive.push_str(&bar);
            }
        }
        html.push_str(&bar_row(&negative, &positive));
    }

    html.push_str("</body></html>\n");
    html
}

fn page_header(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>{title}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n"
    )
}

fn legend() -> String {
    let mut html = String::from("<div class=\"legend\">\n");
    for (ability, color) in PALETTE {
        html.push_str(&format!("<div style=\"background:{color}\">{ability}</div>\n"));
    }
    html.push_str("</div>\n");
    html
}

fn render_path_row(record: &PathRecord) -> String {
    let trace = record.trace();
    let classes = record
        .classes
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let mut negative = String::new();
    let mut positive = String::new();
    for (ability, &value) in &record.abilities {
        if value == 0 {
            continue;
        }
        let tooltip = escape(&format!("{ability}: {value} | {trace} | {classes}"));
        let bar = bar(ability, value, PATH_BAR_SCALE, &tooltip);
        if value < 0 {
            negative.push_str(&bar);
        } else {
            positive.push_str(&bar);
        }
    }
    bar_row(&negative, &positive)
}

fn bar(ability: &str, value: i64, scale: u64, tooltip: &str) -> String {
    let width = value.unsigned_abs().saturating_mul(scale);
    let label = if value >= 0 {
        format!("+{value}")
    } else {
        value.to_string()
    };
    format!(
        "<div class=\"bar\" style=\"width:{width}px; background:{}\" data-tooltip=\"{tooltip}\">{label}</div>",
        color_for(ability)
    )
}

fn bar_row(negative: &str, positive: &str) -> String {
    format!(
        "<div class=\"bar-container\"><div class=\"negative-column\">{negative}</div>\
         <div class=\"zero-line\"></div>\
         <div class=\"positive-column\">{positive}</div></div>\n"
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_for_known_and_unknown() {
        assert_eq!(color_for("Strength"), "#ce0e00");
        assert_eq!(color_for("Juggling"), FALLBACK_COLOR);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_render_html_places_bars_by_sign() {
        let records = vec![PathRecord::from_parts(
            &["Gate", "Fight"],
            &[("Strength", 3), ("Charisma", -2), ("Wisdom", 0)],
            &["Warrior"],
        )];
        let html = render_html(&records);

        assert!(html.contains("Total paths: 1"));

        let row = html
            .lines()
            .find(|line| line.starts_with("<div class=\"bar-container\">"))
            .unwrap();
        let (negative, positive) = row.split_once("zero-line").unwrap();
        assert!(negative.contains(">-2</div>"));
        assert!(negative.contains("width:20px; background:#f5ea57"));
        assert!(positive.contains(">+3</div>"));
        assert!(positive.contains("width:30px; background:#ce0e00"));
        assert!(!row.contains("Wisdom"));
        assert!(row.contains("data-tooltip=\"Strength: 3 | Gate &gt; Fight | Warrior\""));
    }

    #[test]
    fn test_render_html_escapes_path_text() {
        let records = vec![PathRecord::from_parts(&["<script>"], &[("Lumion", 1)], &[])];
        let html = render_html(&records);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_html_extreme_totals_do_not_overflow() {
        let records = vec![PathRecord::from_parts(
            &["Abyss"],
            &[("Strength", i64::MIN), ("Wisdom", i64::MAX)],
            &[],
        )];
        let html = render_html(&records);
        assert!(html.contains(&format!("width:{}px", u64::MAX)));
        assert!(html.contains(&format!(">{}</div>", i64::MIN)));
    }

    #[test]
    fn test_render_class_html() {
        let classes = vec![ClassSheet {
            id: "warrior".into(),
            name: "Warrior & Co".into(),
            hp: 22,
            defense: 4,
            abilities: [("Strength", 3), ("Stealth", -1), ("Wisdom", 0)]
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }];
        let html = render_class_html(&classes);

        assert!(html.contains("<h2>Warrior &amp; Co (HP: 22, Defense: 4)</h2>"));
        let row = html
            .lines()
            .find(|line| line.starts_with("<div class=\"bar-container\">"))
            .unwrap();
        let (negative, positive) = row.split_once("zero-line").unwrap();
        assert!(negative.contains("width:5px; background:#071F2E"));
        assert!(positive.contains("width:15px; background:#ce0e00"));
        assert!(positive.contains("width:0px; background:#5d0281"));
        assert!(positive.contains(">+0</div>"));
    }
}
