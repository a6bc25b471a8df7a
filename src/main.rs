use quizr::{QuizrError, Summary};

fn main() {
    match quizr::run() {
        Ok(Summary::Practiced(tally)) => {
            println!(
                "You submitted {} answers this session ({} correct)",
                tally.submitted, tally.correct
            );
            if tally.correct == tally.submitted && tally.submitted > 0 {
                println!("Well done!");
            }
        }
        Ok(Summary::Listed(_)) => {}
        Err(err) => {
            match &err {
                QuizrError::Session(_) | QuizrError::Deck(_) => eprintln!("{err}"),
                QuizrError::Progress(_) => {
                    eprintln!("{err}\nYour progress may not have been saved.")
                }
                QuizrError::Ui(_) | QuizrError::Panic(_) => {
                    eprintln!("{err}\nSee quizr.log in the data directory for details.")
                }
            }
            std::process::exit(1);
        }
    }
}
