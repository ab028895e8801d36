//! Scénarios de bout en bout : une ligne tapée -> texte affiché.
//!
//! Les valeurs attendues sont celles d’une session neuve, réglages par défaut
//! (4 chiffres significatifs).

use super::constantes;
use super::erreur::Erreur;
use super::reglages::{Reglages, Systeme};
use super::session::{Resultat, Session, Sortie};

fn eval_ok(ligne: &str) -> Resultat {
    Session::new()
        .evaluer_ligne(ligne, &Reglages::default())
        .unwrap_or_else(|e| panic!("ligne={ligne:?} err={e}"))
}

fn eval_err(ligne: &str) -> Erreur {
    match Session::new().evaluer_ligne(ligne, &Reglages::default()) {
        Ok(r) => panic!("ligne={ligne:?} devait échouer, obtenu {:?}", r.sortie),
        Err(e) => e.source,
    }
}

#[test]
fn scen_constante_seule_affiche_sa_fiche() {
    let r = eval_ok("h");
    let Sortie::Constante { fiche, cgs, .. } = &r.sortie else {
        panic!("fiche attendue, obtenu {:?}", r.sortie);
    };
    assert_eq!(fiche.description, "Planck constant");
    assert_eq!(fiche.valeur, "6.62607015e-34");
    assert_eq!(fiche.incertitude, "0.0");
    assert_eq!(fiche.unite, "J s");
    assert_eq!(fiche.reference, "CODATA 2018");
    assert_eq!(cgs, "6.62607e-27 erg s");

    let bloc = r.si();
    assert!(bloc.contains("Name   = Planck constant"), "{bloc}");
    assert!(bloc.contains("Value  = 6.62607015e-34"), "{bloc}");
}

#[test]
fn scen_energie_de_masse_de_l_electron() {
    let r = eval_ok("m_e c^2");
    assert_eq!(r.expression, "m_e*c^2");
    assert_eq!(r.cgs(), "8.187e-07 cm2 g / s2");
    assert_eq!(r.si(), "8.187e-14 m2 kg / s2");

    let r = eval_ok("m_e c^2, in MeV");
    assert_eq!(r.principal(Systeme::Si), "0.5110 MeV");
    assert_eq!(r.expression, "m_e*c^2, in MeV");
}

#[test]
fn scen_vitesse_orbitale_terrestre() {
    let r = eval_ok("sqrt(G M_sun / au)");
    assert_eq!(r.expression, "sqrt(G*M_sun/au)");
    assert_eq!(r.cgs(), "2.978e+06 cm / s");
    assert_eq!(r.si(), "2.978e+04 m / s");
    assert_eq!(eval_ok("sqrt(G M_sun / au), in km/s").si(), "29.78 km / s");
}

#[test]
fn scen_division_par_zero() {
    let e = Session::new()
        .evaluer_ligne("1 / 0", &Reglages::default())
        .unwrap_err();
    assert_eq!(e.numero, 1);
    assert_eq!(e.source, Erreur::DivisionParZero);
}

#[test]
fn scen_affectations_en_chaine() {
    let mut s = Session::new();
    let r = s
        .evaluer_ligne("M = 1.4 M_sun, R = 10 km, sqrt(2 G M / R)", &Reglages::default())
        .unwrap();
    assert_eq!(r.expression, "M = 1.4*M_sun, R = 10*km, sqrt(2*G*M/R)");
    assert_eq!(r.cgs(), "1.928e+10 cm / s");
    assert_eq!(r.si(), "1.928e+08 m / s");

    // la variable survit à la ligne
    let m = s.evaluer_ligne("M", &Reglages::default()).unwrap();
    assert_eq!(m.cgs(), "2.784e+33 g");
    assert_eq!(m.si(), "2.784e+30 kg");

    // ... mais pas à la session
    assert_eq!(eval_err("M"), Erreur::SymboleInconnu("M".into()));
}

#[test]
fn scen_multiplication_implicite() {
    let r = eval_ok("2 arcsec/radian");
    assert_eq!(r.expression, "2*arcsec/radian");
    assert_eq!(r.si(), "9.696e-06");
    assert_eq!(eval_ok("x = 6, x / 2 3").si(), "1.000");
}

#[test]
fn scen_dimensions_incompatibles() {
    assert!(matches!(eval_err("1 km + 1 s"), Erreur::Dimensions { .. }));
    assert!(matches!(eval_err("m_e c^2, in km"), Erreur::Dimensions { .. }));
    assert!(matches!(eval_err("sin(3 km)"), Erreur::Dimensions { .. }));
}

#[test]
fn scen_nombre_pur_vers_degres() {
    assert_eq!(eval_ok("pi/2, in deg").si(), "90.00 deg");
    assert_eq!(eval_ok("arcsin(1), in degree").si(), "90.00 degree");
}

#[test]
fn scen_stefan_boltzmann_cgs() {
    let r = eval_ok("1 sigma_sb");
    assert_eq!(r.cgs(), "5.670e-05 g / (K4 s3)");
    let fiche = constantes::chercher("sigma_sb").unwrap().texte_cgs();
    assert_eq!(fiche, "5.67037e-05 erg / (cm2 K4 s)");
}

#[test]
fn scen_chiffres_reglables() {
    let r = Session::new()
        .evaluer_ligne("c", &Reglages::default().avec_chiffres(2))
        .unwrap();
    // la fiche d’une constante ne dépend pas des chiffres
    assert!(matches!(r.sortie, Sortie::Constante { .. }));

    let r = Session::new()
        .evaluer_ligne("1 c", &Reglages::default().avec_chiffres(2))
        .unwrap();
    assert_eq!(r.si(), "3.0e+08 m / s");
    let r = Session::new()
        .evaluer_ligne("1 c", &Reglages::default().avec_chiffres(8))
        .unwrap();
    assert_eq!(r.si(), "2.9979246e+08 m / s");
}

#[test]
fn scen_echec_partiel_numerote() {
    let mut s = Session::new();
    let e = s
        .evaluer_ligne("a = 2, b = a zorglub, c = 3", &Reglages::default())
        .unwrap_err();
    assert_eq!(e.numero, 2);
    assert_eq!(e.instruction, "b = a zorglub");
    assert_eq!(e.source, Erreur::SymboleInconnu("zorglub".into()));
    assert_eq!(
        e.to_string(),
        "instruction 2 (b = a zorglub) : symbole inconnu : zorglub"
    );
    assert!(s.variable("a").is_some());
}

#[test]
fn scen_deterministe() {
    let lignes = [
        "sqrt(G M_sun / au)",
        "m_e c^2, in MeV",
        "M = 1.4 M_sun, R = 10 km, sqrt(2 G M / R)",
        "k_B 1e4 K / (m_p c^2)",
    ];
    for l in lignes {
        let a = eval_ok(l);
        let b = eval_ok(l);
        assert_eq!(a, b, "ligne={l:?}");
    }
}

#[test]
fn scen_separateurs_equivalents() {
    let virgule = eval_ok("x = 3 km, y = 2 x, y");
    let point_virgule = eval_ok("x = 3 km; y = 2 x; y");
    let lignes = eval_ok("x = 3 km\ny = 2 x\ny");
    assert_eq!(virgule.si(), "6000 m");
    assert_eq!(virgule.si(), point_virgule.si());
    assert_eq!(virgule.si(), lignes.si());
}

#[test]
fn scen_force_coulombienne_en_esu() {
    let r = eval_ok("e.esu^2 / (0.1 nm)^2");
    assert_eq!(r.expression, "e.esu^2/(0.1*nm)^2");
    assert_eq!(r.cgs(), "2.307e-03 statC2 / cm2");
    assert_eq!(r.si(), "2.567e-18 C2 / m2");
}

#[test]
fn scen_surfaces_en_parsecs() {
    assert_eq!(eval_ok("(3 pc)^2, in pc2").si(), "9.000 pc2");
    assert_eq!(eval_ok("1 pc2").cgs(), "9.521e+36 cm2");
    assert!(matches!(eval_err("1 pc2, in pc"), Erreur::Dimensions { .. }));
}

#[test]
fn scen_ordre_des_symboles_stable() {
    assert_eq!(eval_ok("3 J s, in s J").si(), "3.000 J s");
    assert_eq!(eval_ok("3 J s, in J s").si(), "3.000 J s");
}
