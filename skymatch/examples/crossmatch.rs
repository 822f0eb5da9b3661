use skymatch::{
    match_with_options, Angle, AngleUnit, MatchOptions, MatchReport, PointRole, PointSet,
};

fn main() -> anyhow::Result<()> {
    // a handful of bright stars (J2000 RA, Dec in degrees)
    let catalog = PointSet::from_degrees(
        &[
            (101.287, -16.716), // Sirius
            (95.988, -52.696),  // Canopus
            (213.915, 19.182),  // Arcturus
            (279.234, 38.784),  // Vega
            (79.172, 45.998),   // Capella
            (78.634, -8.202),   // Rigel
            (114.825, 5.225),   // Procyon
            (88.793, 7.407),    // Betelgeuse
        ],
        PointRole::Candidate,
    )?;

    // detections with a few arcseconds of astrometric error, plus one stray
    let detections = PointSet::from_degrees(
        &[
            (279.2352, 38.7831),
            (88.7925, 7.4083),
            (101.2861, -16.7152),
            (150.000, 20.000),
        ],
        PointRole::Query,
    )?;

    let options = MatchOptions::default().with_parallel(true);
    let result = match_with_options(&detections, &catalog, &options)?;
    let report = MatchReport::new(&result, &catalog)?;

    println!("{}", report);

    let good = report.within(Angle::from_arcseconds(10.0));
    println!("{} of {} detections within 10\"", good.len(), report.len());

    let arcsec = report.separations(AngleUnit::Arcseconds);
    println!("separations [arcsec]: {:.2?}", arcsec);

    if let Some(summary) = report.summary() {
        println!("{}", summary);
    }

    Ok(())
}
