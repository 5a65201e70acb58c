use brushwarp::{build_density, render_heatmap, ImportanceField, TransformMode};

extern crate clap;
extern crate image;

use clap::{App, Arg};

fn main() -> Result<(), failure::Error> {
    let matches = App::new("brushwarp")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Attention-guided separable image warping")
        .arg(
            Arg::with_name("image")
                .help("The image to warp")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("weights")
                .help("A grayscale image of the same size; brighter pixels attract the warp")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .help("Where to write the warped image")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("baseline")
                .short("b")
                .long("baseline")
                .help("Uniform base weight per pixel")
                .takes_value(true)
                .default_value("250"),
        )
        .arg(
            Arg::with_name("transform")
                .short("t")
                .long("transform")
                .help("Boost transform applied to the attention ratio")
                .takes_value(true)
                .possible_values(&["identity", "square", "cube", "sqrt"])
                .default_value("identity"),
        )
        .arg(
            Arg::with_name("heatmap")
                .long("heatmap")
                .help("Also write a jet-colormap rendering of the weights")
                .takes_value(true),
        )
        .get_matches();

    let source = image::open(matches.value_of("image").unwrap())?.to_rgba();
    let weights = image::open(matches.value_of("weights").unwrap())?.to_luma();

    let baseline: f64 = matches.value_of("baseline").unwrap().parse()?;
    let transform = match matches.value_of("transform").unwrap() {
        "square" => TransformMode::Square,
        "cube" => TransformMode::Cube,
        "sqrt" => TransformMode::Sqrt,
        _ => TransformMode::Identity,
    };

    let raw: Vec<f64> = weights.pixels().map(|p| f64::from(p.data[0])).collect();
    let importance = ImportanceField::from_raw(weights.width(), weights.height(), raw)?;

    let density = build_density(&importance, baseline, transform)?;
    #[cfg(feature = "threaded")]
    let warped = brushwarp::warp_threaded(&source, &density)?;
    #[cfg(not(feature = "threaded"))]
    let warped = brushwarp::warp(&source, &density)?;
    warped.save(matches.value_of("output").unwrap())?;

    if let Some(path) = matches.value_of("heatmap") {
        render_heatmap(&importance, baseline).save(path)?;
    }
    Ok(())
}
