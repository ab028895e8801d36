//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - expressions générées syntaxiquement valides, symboles tous connus :
//!   seules les erreurs de DOMAINE sont admises (dimensions, division par zéro,
//!   opération non supportée), jamais Syntaxe ni SymboleInconnu.

use std::time::{Duration, Instant};

use super::erreur::Erreur;
use super::reglages::Reglages;
use super::session::Session;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn choisir<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn is_erreur_attendue(e: &Erreur) -> bool {
    matches!(
        e,
        Erreur::Dimensions { .. } | Erreur::DivisionParZero | Erreur::NonSupportee(_)
    )
}

const NOMBRES: &[&str] = &["0", "1", "2", "3", "0.5", "1.4", "10", "6.674e-08", ".25"];
const UNITES: &[&str] = &["km", "m", "cm", "s", "yr", "g", "kg", "K", "erg", "eV", "AU", "deg", "Hz"];
const CONSTANTES: &[&str] = &["G", "c", "h", "k_B", "m_e", "m_p", "M_sun", "au", "pc", "alpha", "pi"];
const FONCTIONS: &[&str] = &["sqrt", "abs", "sin", "cos", "exp", "log10", "arctan"];

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_atome(rng: &mut Rng) -> String {
    match rng.pick(4) {
        0 => rng.choisir(NOMBRES).to_string(),
        1 => rng.choisir(UNITES).to_string(),
        2 => rng.choisir(CONSTANTES).to_string(),
        _ => format!("{} {}", rng.choisir(NOMBRES), rng.choisir(UNITES)),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atome(rng);
    }

    match rng.pick(9) {
        0 => gen_atome(rng),
        1 => format!("({} + {})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("({} - {})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!("({} * {})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        4 => format!("({} / {})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        5 => format!("({})({})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        6 => format!("({})^{}", gen_expr(rng, depth - 1), rng.choisir(&["2", "-1", "0.5", "(1/3)", "3"])),
        7 => format!("{}({})", rng.choisir(FONCTIONS), gen_expr(rng, depth - 1)),
        _ => format!("-{}", gen_atome(rng)),
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({} + {})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_erreurs_de_domaine() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);
    let reglages = Reglages::default();

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let a = Session::new().evaluer_ligne(&expr, &reglages);
        let b = Session::new().evaluer_ligne(&expr, &reglages);
        // comparaison via Debug : NaN != NaN pour PartialEq
        assert_eq!(format!("{a:?}"), format!("{b:?}"), "non déterministe: expr={expr:?}");

        match a {
            Ok(_) => seen_ok += 1,
            Err(e) => {
                assert!(
                    is_erreur_attendue(&e.source),
                    "erreur non attendue: expr={expr:?} err={e}"
                );
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 10, "trop peu d'erreurs: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_forme_normalisee_reanalysable() {
    // La forme affichée doit se relire et redonner la même forme.
    let t0 = Instant::now();
    let max = Duration::from_millis(300);
    let mut rng = Rng::new(0xBADC0DE_u64);
    let reglages = Reglages::default();

    for _ in 0..80 {
        budget(t0, max);
        let expr = gen_expr(&mut rng, 3);
        if let Ok(r) = Session::new().evaluer_ligne(&expr, &reglages) {
            let r2 = Session::new()
                .evaluer_ligne(&r.expression, &reglages)
                .unwrap_or_else(|e| panic!("relecture: {:?} err={e}", r.expression));
            assert_eq!(r.expression, r2.expression);
        }
    }
}

#[test]
fn fuzz_safe_entrees_hostiles() {
    let reglages = Reglages::default();
    let hostiles = [
        "",
        "((((",
        "))))",
        "= = =",
        "1 +* 2",
        "km^^2",
        "sqrt(",
        "in",
        "in in",
        ",,,",
        "x = ",
        "$$$",
        "1e999999",
        "2^2^2^2^2^2",
        "1e308 * 1e308",
    ];
    for h in hostiles {
        // jamais de panique ; erreur ou résultat, peu importe
        let _ = Session::new().evaluer_ligne(h, &reglages);
    }
}

#[test]
fn fuzz_safe_imbrication_profonde_refusee() {
    let profond = format!("{}1 km{}", "(".repeat(5000), ")".repeat(5000));
    let e = Session::new()
        .evaluer_ligne(&profond, &Reglages::default())
        .unwrap_err();
    assert!(matches!(e.source, Erreur::Syntaxe(_)), "{e}");
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let expr = somme_balancee("0.5 km", 600);
    let r = Session::new()
        .evaluer_ligne(&expr, &Reglages::default())
        .unwrap_or_else(|e| panic!("err: {e}"));
    budget(t0, max);

    // 600 * 0.5 km = 300 km
    assert!((r.quantite().valeur_cgs() - 3e7).abs() < 1e-3);
}
