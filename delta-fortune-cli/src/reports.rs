use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use delta_fortune::calendar::CalendarFacets;
use delta_fortune::containers::ContainerFortune;
use delta_fortune::draw::SkinFortune;
use delta_fortune::zones::{MapAnalysis, ZoneScore};
use delta_fortune::{
    CategoryAnalysis, ComprehensiveAnalysis, FortuneReport, Operator, PalaceReading,
    PlumBlossomReading, WealthAnalysis,
};

fn pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn moment_line(facets: &CalendarFacets) -> String {
    format!(
        "{}  农历{}  {}年 {}日  {} ({}) {}",
        facets.at.format("%Y-%m-%d %H:%M"),
        facets.lunar,
        facets.stem_branch.year,
        facets.stem_branch.day,
        facets.time_slot.label,
        facets.time_slot.range,
        facets.time_slot.element
    )
}

fn operator_line(operator: &Operator) -> String {
    let mut line = format!("{} ({})", operator.codename, operator.element);
    if let Some(role) = &operator.role {
        line.push_str(&format!(" · {role}"));
    }
    line
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    report: &FortuneReport,
    verbose: bool,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "🔮 每日运势报告".bright_cyan().bold())?;
    writeln!(out, "{}", "==============".cyan())?;
    writeln!(out, "干员: {}", operator_line(&report.operator).bold())?;
    writeln!(out, "时间: {}", moment_line(&report.facets))?;
    let luck = format!("{:.2}", report.overall_luck);
    let luck = if report.overall_luck >= 1.2 {
        luck.green()
    } else if report.overall_luck <= 0.8 {
        luck.red()
    } else {
        luck.yellow()
    };
    writeln!(out, "综合运势: {luck}")?;
    writeln!(out)?;

    writeln!(out, "{}", "📜 每日建议".bright_yellow().bold())?;
    for line in &report.daily_advice {
        writeln!(out, "  • {line}")?;
    }
    writeln!(out)?;

    match &report.analysis {
        CategoryAnalysis::Comprehensive(full) => console_comprehensive(out, full, verbose)?,
        CategoryAnalysis::Qimen(palaces) => console_qimen(out, palaces)?,
        CategoryAnalysis::PlumBlossom(reading) => console_plum_blossom(out, reading)?,
        CategoryAnalysis::SkinFortune(skin) => console_skin(out, skin, verbose)?,
        CategoryAnalysis::WealthAnalysis(wealth) => console_wealth(out, wealth)?,
    }
    Ok(())
}

fn console_comprehensive<W: Write + ?Sized>(
    out: &mut W,
    full: &ComprehensiveAnalysis,
    verbose: bool,
) -> Result<()> {
    writeln!(out, "{}", "🗺️ 最佳区域".bright_green().bold())?;
    for zone in &full.best_zones {
        console_zone(out, zone)?;
    }
    writeln!(out, "{}", "☠️ 最差区域".bright_red().bold())?;
    for zone in &full.worst_zones {
        console_zone(out, zone)?;
    }
    if verbose {
        for map in &full.maps {
            writeln!(out, "  {}", map.name.bold())?;
            for zone in &map.zones {
                console_zone(out, zone)?;
            }
        }
    }
    writeln!(out)?;
    console_containers(out, &full.containers, verbose)?;
    console_skin(out, &full.skin, verbose)?;
    console_wealth(out, &full.wealth)?;
    console_qimen(out, &full.qimen)?;
    console_plum_blossom(out, &full.plum_blossom)
}

fn console_zone<W: Write + ?Sized>(out: &mut W, zone: &ZoneScore) -> Result<()> {
    writeln!(
        out,
        "   {} {} ({}·{}) x{:.3} {} / {} 危险{}",
        zone.map,
        zone.zone,
        zone.element,
        zone.direction,
        zone.final_bonus,
        zone.fortune,
        zone.advice,
        zone.danger
    )?;
    Ok(())
}

fn console_containers<W: Write + ?Sized>(
    out: &mut W,
    containers: &ContainerFortune,
    verbose: bool,
) -> Result<()> {
    writeln!(out, "{}", "📦 推荐容器".bright_magenta().bold())?;
    for score in &containers.recommended {
        writeln!(
            out,
            "   {} ({}) 出货率 {:.3} · {} {}",
            score.name.bold(),
            score.element,
            score.final_drop_rate,
            score.rating,
            score.advice
        )?;
    }
    if verbose {
        for score in &containers.analysis.scores {
            writeln!(
                out,
                "     {} 加成 {:.3} ({:.1}/{:.1}/{:.1})",
                score.name, score.total_bonus, score.entity_bonus, score.day_bonus, score.slot_bonus
            )?;
        }
    }
    for line in &containers.advice {
        writeln!(out, "   {}", line.green())?;
    }
    writeln!(out)?;
    Ok(())
}

fn console_skin<W: Write + ?Sized>(out: &mut W, skin: &SkinFortune, verbose: bool) -> Result<()> {
    writeln!(out, "{}", "🎨 皮肤运势".bright_blue().bold())?;
    let character = &skin.character;
    writeln!(
        out,
        "   {}: 单抽 {} (加成 {:.2}) · 保底前 {} · {} {}",
        character.name,
        pct(character.one_draw_luck),
        character.bonus,
        pct(character.before_guaranteed),
        character.recommendation.tier.label(),
        character.recommendation.advice
    )?;
    if verbose {
        for step in &character.ladder {
            let marker = if step.guaranteed { " (保底)" } else { "" };
            writeln!(
                out,
                "     第{}抽 消耗{} 累计{} 概率 {}{marker}",
                step.draw,
                step.cost,
                step.cumulative_cost,
                pct(step.probability)
            )?;
        }
    }
    let weapon = &skin.weapon;
    writeln!(
        out,
        "   {}: 极品S {} · 优品S {} · {} {}",
        weapon.name,
        pct(weapon.premium_s_rate),
        pct(weapon.excellent_s_rate),
        weapon.recommendation.tier.label(),
        weapon.recommendation.advice
    )?;
    for quality in &weapon.qualities {
        writeln!(
            out,
            "     {} ({}) {} → {} {}",
            quality.name,
            quality.element,
            pct(quality.base_rate),
            pct(quality.adjusted_rate),
            quality.fortune
        )?;
    }
    let slots: Vec<String> = skin
        .best_slots
        .iter()
        .map(|slot| format!("{} {}", slot.name, slot.range))
        .collect();
    writeln!(out, "   最佳抽奖时辰: {}", slots.join("、"))?;
    for line in &skin.advice {
        writeln!(out, "   {line}")?;
    }
    writeln!(out)?;
    Ok(())
}

fn console_wealth<W: Write + ?Sized>(out: &mut W, wealth: &WealthAnalysis) -> Result<()> {
    writeln!(out, "{}", "💰 财位喜神".bright_yellow().bold())?;
    writeln!(
        out,
        "   财位: {} / {} ({})",
        wealth.wealth.primary, wealth.wealth.secondary, wealth.wealth.element
    )?;
    writeln!(out, "   {}", wealth.wealth.description)?;
    writeln!(out, "   {}", wealth.wealth.time_advice)?;
    writeln!(out, "   喜神: {} (x{:.1})", wealth.joy.position, wealth.joy.time_bonus)?;
    writeln!(out)?;
    Ok(())
}

fn console_qimen<W: Write + ?Sized>(out: &mut W, palaces: &[PalaceReading]) -> Result<()> {
    writeln!(out, "{}", "🧭 奇门九宫".bright_cyan().bold())?;
    for reading in palaces {
        let line = format!(
            "   {} {} {} ({}) {}",
            reading.palace.name,
            reading.palace.position,
            reading.palace.meaning,
            reading.palace.element,
            reading.recommendation
        );
        if reading.recommendation == "大吉" {
            writeln!(out, "{}", line.green())?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    writeln!(out)?;
    Ok(())
}

fn console_plum_blossom<W: Write + ?Sized>(out: &mut W, reading: &PlumBlossomReading) -> Result<()> {
    writeln!(out, "{}", "🌸 梅花易数".bright_magenta().bold())?;
    writeln!(
        out,
        "   上卦 {} ({}) · 下卦 {} ({}) · 动爻 {}",
        reading.upper.name,
        reading.upper.element,
        reading.lower.name,
        reading.lower.element,
        reading.change_line
    )?;
    writeln!(out, "   {} (x{:.1})", reading.prediction, reading.compatibility)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, report: &FortuneReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    report: &FortuneReport,
    verbose: bool,
) -> Result<()> {
    writeln!(out, "# 每日运势报告: {}\n", report.operator.codename)?;
    writeln!(out, "- 干员: {}", operator_line(&report.operator))?;
    writeln!(out, "- 时间: {}", moment_line(&report.facets))?;
    writeln!(out, "- 分析: `{}`", report.category.key())?;
    writeln!(out, "- 综合运势: {:.2}\n", report.overall_luck)?;

    writeln!(out, "## 每日建议\n")?;
    for line in &report.daily_advice {
        writeln!(out, "- {line}")?;
    }
    writeln!(out)?;

    match &report.analysis {
        CategoryAnalysis::Comprehensive(full) => {
            markdown_zones(out, "最佳区域", &full.best_zones)?;
            markdown_zones(out, "最差区域", &full.worst_zones)?;
            if verbose {
                markdown_maps(out, &full.maps)?;
            }
            markdown_containers(out, &full.containers)?;
            markdown_skin(out, &full.skin)?;
            markdown_wealth(out, &full.wealth)?;
            markdown_qimen(out, &full.qimen)?;
            markdown_plum_blossom(out, &full.plum_blossom)?;
        }
        CategoryAnalysis::Qimen(palaces) => markdown_qimen(out, palaces)?,
        CategoryAnalysis::PlumBlossom(reading) => markdown_plum_blossom(out, reading)?,
        CategoryAnalysis::SkinFortune(skin) => markdown_skin(out, skin)?,
        CategoryAnalysis::WealthAnalysis(wealth) => markdown_wealth(out, wealth)?,
    }
    Ok(())
}

fn markdown_zones<W: Write + ?Sized>(out: &mut W, title: &str, zones: &[ZoneScore]) -> Result<()> {
    writeln!(out, "## {title}\n")?;
    writeln!(out, "| 地图 | 区域 | 五行 | 方位 | 加成 | 运势 | 建议 | 危险 |")?;
    writeln!(out, "|------|------|------|------|------|------|------|------|")?;
    for zone in zones {
        writeln!(
            out,
            "| {} | {} | {} | {} | {:.3} | {} | {} | {} |",
            zone.map,
            zone.zone,
            zone.element,
            zone.direction,
            zone.final_bonus,
            zone.fortune,
            zone.advice,
            zone.danger
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn markdown_maps<W: Write + ?Sized>(out: &mut W, maps: &[MapAnalysis]) -> Result<()> {
    for map in maps {
        markdown_zones(out, &map.name, &map.zones)?;
    }
    Ok(())
}

fn markdown_containers<W: Write + ?Sized>(out: &mut W, containers: &ContainerFortune) -> Result<()> {
    writeln!(out, "## 推荐容器\n")?;
    writeln!(out, "| 容器 | 五行 | 加成 | 出货率 | 评级 |")?;
    writeln!(out, "|------|------|------|--------|------|")?;
    for score in &containers.recommended {
        writeln!(
            out,
            "| {} | {} | {:.3} | {:.3} | {} |",
            score.name, score.element, score.total_bonus, score.final_drop_rate, score.rating
        )?;
    }
    writeln!(out)?;
    for line in &containers.advice {
        writeln!(out, "> {line}\n")?;
    }
    Ok(())
}

fn markdown_skin<W: Write + ?Sized>(out: &mut W, skin: &SkinFortune) -> Result<()> {
    writeln!(out, "## 皮肤运势\n")?;
    writeln!(out, "| 抽数 | 消耗 | 累计 | 概率 |")?;
    writeln!(out, "|------|------|------|------|")?;
    for step in &skin.character.ladder {
        writeln!(
            out,
            "| {}{} | {} | {} | {} |",
            step.draw,
            if step.guaranteed { " (保底)" } else { "" },
            step.cost,
            step.cumulative_cost,
            pct(step.probability)
        )?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "- {}: 单抽 {}，{}",
        skin.character.name,
        pct(skin.character.one_draw_luck),
        skin.character.recommendation.advice
    )?;
    writeln!(
        out,
        "- {}: 极品S {}，优品S {}，{}",
        skin.weapon.name,
        pct(skin.weapon.premium_s_rate),
        pct(skin.weapon.excellent_s_rate),
        skin.weapon.recommendation.advice
    )?;
    for line in &skin.advice {
        writeln!(out, "- {line}")?;
    }
    writeln!(out)?;
    Ok(())
}

fn markdown_wealth<W: Write + ?Sized>(out: &mut W, wealth: &WealthAnalysis) -> Result<()> {
    writeln!(out, "## 财位喜神\n")?;
    writeln!(out, "{}\n", wealth.wealth.description)?;
    writeln!(out, "{}\n", wealth.wealth.time_advice)?;
    writeln!(out, "{}\n", wealth.joy.description)?;
    Ok(())
}

fn markdown_qimen<W: Write + ?Sized>(out: &mut W, palaces: &[PalaceReading]) -> Result<()> {
    writeln!(out, "## 奇门九宫\n")?;
    writeln!(out, "| 宫位 | 数 | 五行 | 门 | 加成 | 建议 |")?;
    writeln!(out, "|------|----|------|----|------|------|")?;
    for reading in palaces {
        writeln!(
            out,
            "| {} | {} | {} | {} | {:.1} | {} |",
            reading.palace.name,
            reading.palace.position,
            reading.palace.element,
            reading.palace.meaning,
            reading.time_bonus,
            reading.recommendation
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn markdown_plum_blossom<W: Write + ?Sized>(
    out: &mut W,
    reading: &PlumBlossomReading,
) -> Result<()> {
    writeln!(out, "## 梅花易数\n")?;
    writeln!(
        out,
        "上卦 {} ({})，下卦 {} ({})，动爻 {}：{}\n",
        reading.upper.name,
        reading.upper.element,
        reading.lower.name,
        reading.lower.element,
        reading.change_line,
        reading.prediction
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use delta_fortune::{AnalysisCategory, BundledLoader, FortuneEngine};

    fn report(category: AnalysisCategory) -> FortuneReport {
        let mut engine = FortuneEngine::new(BundledLoader);
        engine.load().unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        engine.compute_daily_fortune("蜂医", category, at).unwrap()
    }

    #[test]
    fn console_report_lists_advice_and_sections() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        generate_console_report(&mut buffer, &report(AnalysisCategory::Comprehensive), true)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("干员: 蜂医 (木)"));
        assert!(text.contains("甲午日"));
        assert!(text.contains("📊 今日运势平稳"));
        assert!(text.contains("推荐容器"));
        assert!(text.contains("服务器"));
        assert!(text.contains("第8抽"));
        assert!(text.contains("优品S"));
        assert!(text.contains("梅花易数"));
    }

    #[test]
    fn markdown_report_narrows_to_category() {
        let mut buffer = Vec::new();
        generate_markdown_report(&mut buffer, &report(AnalysisCategory::Qimen), false).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("# 每日运势报告: 蜂医"));
        assert!(text.contains("## 奇门九宫"));
        assert!(text.contains("| 乾宫 | 6 |"));
        assert!(!text.contains("## 皮肤运势"));
    }

    #[test]
    fn json_report_is_valid_json() {
        let mut buffer = Vec::new();
        generate_json_report(&mut buffer, &report(AnalysisCategory::WealthAnalysis)).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["category"], "wealth_analysis");
        assert_eq!(value["operator"]["codename"], "蜂医");
        assert_eq!(value["analysis"]["wealth_analysis"]["wealth"]["primary"], "西南");
    }
}
