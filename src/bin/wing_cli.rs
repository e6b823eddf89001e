fn main() {
    if let Err(err) = cli::run() {
        eprintln!("wing_cli error: {err}");
        std::process::exit(1);
    }
}

mod cli {
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    use wingmesh_engine::components::{
        GeometryMesh, MeshComponent, ParameterSet, complex_step_jacobian,
    };
    use wingmesh_engine::config::{GeometryConfig, PRESET_NAMES};
    use wingmesh_engine::geom::{PlanformSummary, Tolerance, WingMesh, mirror};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"wing_cli (wingmesh-engine)

USAGE:
  wing_cli list
  wing_cli run <preset|config.json> [options]
  wing_cli derivs <preset|config.json> [--step <h>]

OPTIONS (run):
  --obj <path>       Write Wavefront OBJ with quad panels
  --snap <path>      Write text snapshot instead of printing it
  --full             Mirror the half-mesh before writing
  --overwrite        Overwrite existing output files
  -h, --help         Show this help

OPTIONS (derivs):
  --step <h>         Complex step size (default 1e-30)
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                for name in PRESET_NAMES {
                    println!("{name}");
                }
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "derivs" => cmd_derivs(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    /// Preset name, or a path to a JSON configuration file.
    fn load_config(source: &str) -> Result<GeometryConfig, String> {
        if PRESET_NAMES.contains(&source) {
            return GeometryConfig::preset(source).map_err(|e| e.to_string());
        }
        let path = Path::new(source);
        if !path.exists() {
            return Err(unknown_config(source));
        }
        let text = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
        GeometryConfig::from_json_str(&text).map_err(|e| format!("{}: {e}", path.display()))
    }

    fn unknown_config(name: &str) -> String {
        let mut msg = format!("`{name}` is neither a preset nor a file\n\navailable presets:\n");
        for preset in PRESET_NAMES {
            let _ = writeln!(msg, "  {preset}");
        }
        msg
    }

    fn prepare(config: &GeometryConfig) -> Result<(GeometryMesh, ParameterSet), String> {
        let component = config.build_component().map_err(|e| e.to_string())?;
        let params = config.parameters(&component).map_err(|e| e.to_string())?;
        Ok((component, params))
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let source = args.next().ok_or("missing preset or config path")?;

        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut full = false;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--full" => full = true,
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let config = load_config(&source)?;
        let (component, params) = prepare(&config)?;
        let mut mesh = component.evaluate(&params).map_err(|e| e.to_string())?;
        if full {
            // The half-mesh ends on the symmetry plane.
            mesh = mirror(&mesh, false).map_err(|e| e.to_string())?;
        }

        let summary = PlanformSummary::from_mesh(&mesh);
        let text = snapshot(&config.name, |out| {
            write_summary(out, &summary);
            write_mesh(out, &mesh);
        });

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &text, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{text}");
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &mesh, &config.name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        eprintln!("{}: {}", config.name, summary.summary());
        Ok(())
    }

    fn cmd_derivs(args: &mut Args) -> Result<(), String> {
        let source = args.next().ok_or("missing preset or config path")?;
        let mut step = Tolerance::COMPLEX_STEP.eps;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--step" => {
                    let raw = args.value("--step")?;
                    step = raw
                        .parse()
                        .map_err(|e| format!("invalid --step `{raw}`: {e}"))?;
                }
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let config = load_config(&source)?;
        let (component, params) = prepare(&config)?;
        let columns = complex_step_jacobian(&component, &params, step).map_err(|e| e.to_string())?;

        let mut out = String::new();
        let _ = writeln!(out, "# wingmesh-engine derivatives v1");
        let _ = writeln!(out, "config {}", config.name);
        let _ = writeln!(out, "step {step:.1e}");
        for column in &columns {
            let _ = write!(out, "d/d{} max_abs ", column.variable);
            write_f64(&mut out, column.max_abs());
            out.push('\n');
        }
        print!("{}", normalize_snapshot_text(&out));
        Ok(())
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text)).map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn write_obj_file(path: &Path, mesh: &WingMesh, name: &str, overwrite: bool) -> Result<(), String> {
        mesh.validate_finite()
            .map_err(|e| format!("mesh validation failed: {e}"))?;

        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "# wingmesh-engine wing_cli").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "o {name}").map_err(|e| format!("write obj: {e}"))?;

        for p in mesh.real_points() {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(|e| format!("write obj: {e}"))?;
        }

        // One quad per panel, vertices numbered from 1.
        let (num_x, num_y) = mesh.shape();
        for ix in 0..num_x.saturating_sub(1) {
            for iy in 0..num_y.saturating_sub(1) {
                let a = ix * num_y + iy + 1;
                let b = a + 1;
                let c = a + num_y + 1;
                let d = a + num_y;
                writeln!(w, "f {a} {b} {c} {d}").map_err(|e| format!("write obj: {e}"))?;
            }
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == 0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_vec3_line(out: &mut String, prefix: &str, v: [f64; 3]) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, v[0]);
        out.push(' ');
        write_f64(out, v[1]);
        out.push(' ');
        write_f64(out, v[2]);
        out.push('\n');
    }

    fn write_summary(out: &mut String, summary: &PlanformSummary) {
        let fields = [
            ("planform.span", summary.span),
            ("planform.root_chord", summary.root_chord),
            ("planform.tip_chord", summary.tip_chord),
            ("planform.projected_area", summary.projected_area),
        ];
        for (key, value) in fields {
            let _ = write!(out, "{key} ");
            write_f64(out, value);
            out.push('\n');
        }
        let _ = writeln!(out, "planform.monotonic_span {}", summary.monotonic_span);
    }

    fn write_mesh(out: &mut String, mesh: &WingMesh) {
        let (num_x, num_y) = mesh.shape();
        let _ = writeln!(out, "mesh.shape {num_x} {num_y}");
        let _ = writeln!(out, "mesh.points {}", num_x * num_y);
        for p in mesh.real_points() {
            write_vec3_line(out, "p", p);
        }
    }

    fn snapshot(name: &str, sections: impl FnOnce(&mut String)) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# wingmesh-engine snapshot v1");
        let _ = writeln!(out, "config {name}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        sections(&mut out);
        normalize_snapshot_text(&out)
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }

}
