use super::pipeline_metrics::PipelineMetrics;

pub fn render_prometheus(m: &PipelineMetrics) -> String {
    let mut out = String::with_capacity(1024);

    write_counter(&mut out, "hostpulse_collect_cycles_ok_total", m.collect_cycles_ok_val());
    write_counter(&mut out, "hostpulse_collect_cycles_failed_total", m.collect_cycles_failed_val());
    write_counter(&mut out, "hostpulse_points_written_total", m.points_written_val());
    write_counter(&mut out, "hostpulse_rules_skipped_total", m.rules_skipped_val());
    write_counter(&mut out, "hostpulse_alerts_raised_total", m.alerts_raised_val());
    write_counter(&mut out, "hostpulse_alerts_suppressed_total", m.alerts_suppressed_val());
    write_counter(&mut out, "hostpulse_notifications_sent_total", m.notifications_sent_val());
    write_counter(&mut out, "hostpulse_notifications_failed_total", m.notifications_failed_val());
    write_counter(&mut out, "hostpulse_alerts_persisted_total", m.alerts_persisted_val());
    write_counter(&mut out, "hostpulse_alerts_persist_failed_total", m.alerts_persist_failed_val());

    out
}

fn write_counter(out: &mut String, name: &str, val: u64) {
    use std::fmt::Write;
    let _ = writeln!(out, "# TYPE {name} counter");
    let _ = writeln!(out, "{name} {val}");
}
