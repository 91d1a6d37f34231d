use crate::models::stats::{format_number, num_list_to_string, StatsOs, CPU_HISTORY_WINDOW};

use super::element::{make_data, make_row, make_table, Element};

/// Key/value table of the headline OS numbers.
pub fn os_stats_table(stats: &StatsOs) -> Element {
    let rows = vec![
        kv("freemem", format_number(stats.freemem)),
        kv("totalmem", format_number(stats.totalmem)),
        kv("loadavg", num_list_to_string(&stats.loadavg)),
        kv("uptime", format_number(stats.uptime)),
        kv("cpus", stats.cpus.len().to_string()),
        kv(
            &format!("cpuBusy ({})", CPU_HISTORY_WINDOW),
            num_list_to_string(stats.cpu_busy_history()),
        ),
    ];
    make_table(rows, "v-os-table")
}

fn kv(key: &str, value: String) -> Element {
    make_row(vec![make_data(key, ""), make_data(value, "")], "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::text::render_table;

    #[test]
    fn test_os_table_rows() {
        let stats = StatsOs {
            freemem: 512.0,
            totalmem: 1024.0,
            loadavg: vec![1.5, 1.0],
            uptime: 60.0,
            ..Default::default()
        };
        let table = os_stats_table(&stats);
        assert_eq!(table.class.as_deref(), Some("v-os-table"));
        let text = render_table(&table);
        assert!(text.contains("loadavg"));
        assert!(text.contains("1.5, 1"));
        assert_eq!(table.child_elements().count(), 6);
    }
}
